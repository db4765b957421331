//! The concept-development session as a value.
//!
//! A `ConceptState` holds everything the six steps produce. Step functions
//! in `apply` take a state by reference and return a new one; nothing here
//! performs I/O.

use serde::{Deserialize, Serialize};

use super::partner::SelectedPartner;
use crate::domain::foundation::{ActionType, ConceptStep, EntityId, Sector, SessionId, Timestamp};

/// Default project duration in months.
pub const DEFAULT_CONCEPT_DURATION: u32 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Study,
    Report,
    Article,
    #[default]
    Other,
}

/// Research material attached in step 2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchSource {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "type", default)]
    pub kind: SourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub key_findings: Vec<String>,
    #[serde(default)]
    pub is_analyzed: bool,
    #[serde(default)]
    pub is_analyzing: bool,
    #[serde(default)]
    pub is_extracting: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResearchSource {
    pub fn new(id: EntityId, title: impl Into<String>, content: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
            kind,
            summary: None,
            key_findings: Vec::new(),
            is_analyzed: false,
            is_analyzing: false,
            is_extracting: false,
            error: None,
        }
    }
}

/// One of the alternative project concepts generated in step 2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptProposal {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub acronym: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub problem_statement: String,
    #[serde(default)]
    pub innovation: String,
    #[serde(default)]
    pub target_groups: Vec<String>,
    #[serde(default)]
    pub objectives: Vec<String>,
    #[serde(default)]
    pub main_outputs: Vec<String>,
    #[serde(default)]
    pub erasmus_priorities: Vec<String>,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub saved_for_later: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptAssessment {
    pub concept_id: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub improvement_tip: String,
}

/// Side-by-side evaluation of the generated concepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptComparison {
    pub recommendation_id: String,
    #[serde(default)]
    pub overall_summary: String,
    pub comparisons: Vec<ConceptAssessment>,
}

/// A SMART objective for step 4.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartObjective {
    pub id: EntityId,
    pub text: String,
    #[serde(default)]
    pub indicators: Vec<String>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub erasmus_priority: Option<String>,
}

/// Start and end month, both inclusive and 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthSpan {
    pub start: u32,
    pub end: u32,
}

/// A work package (KA220) or activity (KA210) proposed in step 5.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkPackageSuggestion {
    /// Position in the generated list, assigned on apply.
    #[serde(default)]
    pub number: u32,
    pub title: String,
    /// MANAGEMENT, DEVELOPMENT, DISSEMINATION, ACTIVITY, ...
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(default)]
    pub deliverables: Vec<String>,
    pub duration: MonthSpan,
    /// Name of the leading partner as it appears in the consortium.
    #[serde(default)]
    pub lead: String,
}

/// Full state of one concept-development session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptState {
    pub session_id: SessionId,
    #[serde(default)]
    pub current_step: ConceptStep,

    // Step 1: idea
    #[serde(default)]
    pub idea: String,
    #[serde(default)]
    pub enhanced_idea: Option<String>,
    #[serde(default)]
    pub target_group: String,
    #[serde(default)]
    pub problem: String,
    #[serde(default)]
    pub enhanced_problem: Option<String>,
    #[serde(default)]
    pub sector: Sector,
    #[serde(default)]
    pub action_type: ActionType,
    #[serde(default)]
    pub budget_tier: u64,
    #[serde(default = "default_duration")]
    pub duration: u32,
    #[serde(default)]
    pub priority_focus: String,
    #[serde(default)]
    pub additional_instructions: String,
    #[serde(default)]
    pub is_enhanced: bool,

    // Step 2: sources and concepts
    #[serde(default)]
    pub sources: Vec<ResearchSource>,
    #[serde(default)]
    pub concepts: Vec<ConceptProposal>,
    #[serde(default)]
    pub selected_concept_id: Option<EntityId>,
    #[serde(default)]
    pub concepts_generated: bool,
    #[serde(default)]
    pub concept_error: Option<String>,
    #[serde(default)]
    pub concept_comparison: Option<ConceptComparison>,
    #[serde(default)]
    pub compare_concepts_error: Option<String>,

    // Step 3: consortium
    #[serde(default)]
    pub selected_partners: Vec<SelectedPartner>,

    // Step 4: objectives
    #[serde(default)]
    pub objectives: Vec<SmartObjective>,
    #[serde(default)]
    pub selected_objective_ids: Vec<EntityId>,
    #[serde(default)]
    pub objectives_generated: bool,
    #[serde(default)]
    pub objectives_error: Option<String>,

    // Step 5: work packages
    #[serde(default)]
    pub work_packages: Vec<WorkPackageSuggestion>,
    #[serde(default)]
    pub selected_wp_numbers: Vec<u32>,
    #[serde(default)]
    pub wp_generated: bool,
    #[serde(default)]
    pub wp_error: Option<String>,

    // Step 6: summary
    #[serde(default)]
    pub detailed_concept: Option<String>,
    #[serde(default)]
    pub detailed_concept_error: Option<String>,
    #[serde(default)]
    pub translated_concept: Option<String>,
    #[serde(default)]
    pub translation_error: Option<String>,

    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

fn default_duration() -> u32 {
    DEFAULT_CONCEPT_DURATION
}

impl ConceptState {
    /// Creates an empty session at the idea step.
    pub fn new(session_id: SessionId) -> Self {
        let now = Timestamp::now();
        Self {
            session_id,
            current_step: ConceptStep::Idea,
            idea: String::new(),
            enhanced_idea: None,
            target_group: String::new(),
            problem: String::new(),
            enhanced_problem: None,
            sector: Sector::default(),
            action_type: ActionType::default(),
            budget_tier: 0,
            duration: DEFAULT_CONCEPT_DURATION,
            priority_focus: String::new(),
            additional_instructions: String::new(),
            is_enhanced: false,
            sources: Vec::new(),
            concepts: Vec::new(),
            selected_concept_id: None,
            concepts_generated: false,
            concept_error: None,
            concept_comparison: None,
            compare_concepts_error: None,
            selected_partners: Vec::new(),
            objectives: Vec::new(),
            selected_objective_ids: Vec::new(),
            objectives_generated: false,
            objectives_error: None,
            work_packages: Vec::new(),
            selected_wp_numbers: Vec::new(),
            wp_generated: false,
            wp_error: None,
            detailed_concept: None,
            detailed_concept_error: None,
            translated_concept: None,
            translation_error: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The enhanced idea if present, else the raw one.
    pub fn idea_text(&self) -> &str {
        non_empty(self.enhanced_idea.as_deref()).unwrap_or(&self.idea)
    }

    /// The enhanced problem if present, else the raw one.
    pub fn problem_text(&self) -> &str {
        non_empty(self.enhanced_problem.as_deref()).unwrap_or(&self.problem)
    }

    pub fn selected_concept(&self) -> Option<&ConceptProposal> {
        let id = self.selected_concept_id.as_ref()?;
        self.concepts.iter().find(|c| &c.id == id)
    }

    pub fn source(&self, id: &EntityId) -> Option<&ResearchSource> {
        self.sources.iter().find(|s| &s.id == id)
    }

    pub fn analyzed_sources(&self) -> impl Iterator<Item = &ResearchSource> {
        self.sources.iter().filter(|s| s.is_analyzed)
    }

    /// Selected objectives in generation order.
    pub fn selected_objectives(&self) -> impl Iterator<Item = &SmartObjective> {
        self.objectives
            .iter()
            .filter(|o| self.selected_objective_ids.contains(&o.id))
    }

    /// Selected work packages in generation order.
    pub fn selected_work_packages(&self) -> impl Iterator<Item = &WorkPackageSuggestion> {
        self.work_packages
            .iter()
            .filter(|wp| self.selected_wp_numbers.contains(&wp.number))
    }

    pub(crate) fn touched(mut self) -> Self {
        self.updated_at = Timestamp::now();
        self
    }
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}
