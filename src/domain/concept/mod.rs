//! Concept module - The six-step concept development workflow.
//!
//! `ConceptState` is a plain value. Step functions take a state and return
//! a new one, so a handler can load, transform and save without holding
//! any shared mutable store.

mod apply;
mod edit;
mod export;
mod navigation;
mod partner;
mod state;

pub use apply::{
    apply_comparison, apply_concepts, apply_detailed_concept, apply_enhanced_idea,
    apply_enhancement_fallback, apply_objectives, apply_regenerated_objective,
    apply_source_analysis, apply_translation, apply_work_packages, begin_source_analysis,
    ensure_comparable, record_failure, require_detailed_concept, require_selected_concept,
    EnhancedIdea, ErrorScope, GeneratedConcept, GeneratedConcepts, GeneratedObjective,
    GeneratedObjectives, GeneratedWorkPackages, RegeneratedObjective, SourceAnalysis,
    ANALYSIS_FAILED_MESSAGE, SELECT_CONCEPT_FIRST,
};
pub use edit::{apply_edit, ConceptEdit, IdeaFields};
pub use export::export_project;
pub use navigation::{can_proceed, navigate};
pub use partner::{
    ConsortiumAnalysis, ConsortiumRole, ExpertiseArea, PartnerProfile, PartnerSuggestion,
    PartnerSuggestions, ProjectBrief, SelectedPartner,
};
pub use state::{
    ConceptAssessment, ConceptComparison, ConceptProposal, ConceptState, MonthSpan,
    ResearchSource, SmartObjective, SourceKind, WorkPackageSuggestion, DEFAULT_CONCEPT_DURATION,
};
