//! Step functions that fold generation results into a `ConceptState`.
//!
//! Every `apply_*` returns a complete new state and clears the step's error.
//! When a generation fails the caller uses `record_failure` instead, which
//! only writes the step-scoped message and leaves earlier output in place.

use serde::Deserialize;

use super::state::{
    ConceptComparison, ConceptProposal, ConceptState, SmartObjective, WorkPackageSuggestion,
};
use crate::domain::foundation::{EntityId, Timestamp, ValidationError};
use crate::domain::normalizer::strip_markdown_fence;

pub const ANALYSIS_FAILED_MESSAGE: &str = "Analysis failed. Please try again.";
pub const SELECT_CONCEPT_FIRST: &str = "Please select a concept in step 2 first.";

// ════════════════════════════════════════════════════════════════════════════════
// Model response shapes
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedIdea {
    pub enhanced_idea: String,
    pub enhanced_problem: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceAnalysis {
    pub summary: String,
    #[serde(default)]
    pub key_findings: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedConcept {
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
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedConcepts {
    pub concepts: Vec<GeneratedConcept>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedObjective {
    pub text: String,
    #[serde(default)]
    pub indicators: Vec<String>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub erasmus_priority: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedObjectives {
    pub objectives: Vec<GeneratedObjective>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegeneratedObjective {
    pub objective: GeneratedObjective,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedWorkPackages {
    pub work_packages: Vec<WorkPackageSuggestion>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Failure recording
// ════════════════════════════════════════════════════════════════════════════════

/// Which step-scoped error field a failure belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorScope {
    Source(EntityId),
    Concepts,
    Comparison,
    Objectives,
    WorkPackages,
    DetailedConcept,
    Translation,
}

/// Writes `message` into the error field for `scope`; all content stays as it was.
pub fn record_failure(state: &ConceptState, scope: &ErrorScope, message: impl Into<String>) -> ConceptState {
    let message = Some(message.into());
    let mut next = state.clone();
    match scope {
        ErrorScope::Source(id) => {
            if let Some(source) = next.sources.iter_mut().find(|s| &s.id == id) {
                source.is_analyzing = false;
                source.error = message;
            }
        }
        ErrorScope::Concepts => {
            next.concept_error = message;
            next.concepts_generated = !next.concepts.is_empty();
        }
        ErrorScope::Comparison => next.compare_concepts_error = message,
        ErrorScope::Objectives => next.objectives_error = message,
        ErrorScope::WorkPackages => next.wp_error = message,
        ErrorScope::DetailedConcept => next.detailed_concept_error = message,
        ErrorScope::Translation => next.translation_error = message,
    }
    next.touched()
}

// ════════════════════════════════════════════════════════════════════════════════
// Step 1: idea
// ════════════════════════════════════════════════════════════════════════════════

pub fn apply_enhanced_idea(state: &ConceptState, enhanced: EnhancedIdea) -> ConceptState {
    let mut next = state.clone();
    next.enhanced_idea = Some(enhanced.enhanced_idea);
    next.enhanced_problem = Some(enhanced.enhanced_problem);
    next.is_enhanced = true;
    next.touched()
}

/// Degraded outcome of a failed enhancement: the raw text is used as-is.
pub fn apply_enhancement_fallback(state: &ConceptState) -> ConceptState {
    let mut next = state.clone();
    next.enhanced_idea = Some(state.idea.clone());
    next.enhanced_problem = Some(state.problem.clone());
    next.is_enhanced = true;
    next.touched()
}

// ════════════════════════════════════════════════════════════════════════════════
// Step 2: sources and concepts
// ════════════════════════════════════════════════════════════════════════════════

/// Marks a source as being analyzed and clears its previous error.
pub fn begin_source_analysis(state: &ConceptState, source_id: &EntityId) -> Result<ConceptState, ValidationError> {
    let source = state
        .source(source_id)
        .ok_or_else(|| ValidationError::precondition(format!("Unknown source {}", source_id)))?;
    if source.content.trim().is_empty() {
        return Err(ValidationError::empty_field("content"));
    }

    let mut next = state.clone();
    if let Some(source) = next.sources.iter_mut().find(|s| &s.id == source_id) {
        source.is_analyzing = true;
        source.error = None;
    }
    Ok(next.touched())
}

pub fn apply_source_analysis(state: &ConceptState, source_id: &EntityId, analysis: SourceAnalysis) -> ConceptState {
    let mut next = state.clone();
    if let Some(source) = next.sources.iter_mut().find(|s| &s.id == source_id) {
        source.summary = Some(analysis.summary);
        source.key_findings = analysis.key_findings;
        source.is_analyzed = true;
        source.is_analyzing = false;
        source.error = None;
    }
    next.touched()
}

/// Replaces any previous concepts; the selection is reset.
pub fn apply_concepts(state: &ConceptState, generated: GeneratedConcepts, now: Timestamp) -> ConceptState {
    let millis = now.as_millis();
    let concepts = generated
        .concepts
        .into_iter()
        .enumerate()
        .map(|(i, c)| ConceptProposal {
            id: EntityId::generated("concept", millis, i),
            title: c.title,
            acronym: c.acronym,
            summary: c.summary,
            problem_statement: c.problem_statement,
            innovation: c.innovation,
            target_groups: c.target_groups,
            objectives: c.objectives,
            main_outputs: c.main_outputs,
            erasmus_priorities: c.erasmus_priorities,
            selected: false,
            saved_for_later: false,
        })
        .collect();

    let mut next = state.clone();
    next.concepts = concepts;
    next.selected_concept_id = None;
    next.concepts_generated = true;
    next.concept_error = None;
    next.concept_comparison = None;
    next.compare_concepts_error = None;
    next.touched()
}

/// Comparing needs at least two concepts.
pub fn ensure_comparable(state: &ConceptState) -> Result<(), ValidationError> {
    if state.concepts.len() < 2 {
        return Err(ValidationError::precondition(
            "At least two concepts are needed for a comparison.",
        ));
    }
    Ok(())
}

pub fn apply_comparison(state: &ConceptState, comparison: ConceptComparison) -> ConceptState {
    let mut next = state.clone();
    next.concept_comparison = Some(comparison);
    next.compare_concepts_error = None;
    next.touched()
}

// ════════════════════════════════════════════════════════════════════════════════
// Step 4: objectives
// ════════════════════════════════════════════════════════════════════════════════

/// Returns the selected concept or the guidance error for steps that build on it.
pub fn require_selected_concept(state: &ConceptState) -> Result<&ConceptProposal, ValidationError> {
    state
        .selected_concept()
        .ok_or_else(|| ValidationError::precondition(SELECT_CONCEPT_FIRST))
}

/// Replaces the objectives; every generated objective starts selected.
pub fn apply_objectives(state: &ConceptState, generated: GeneratedObjectives, now: Timestamp) -> ConceptState {
    let millis = now.as_millis();
    let objectives: Vec<SmartObjective> = generated
        .objectives
        .into_iter()
        .enumerate()
        .map(|(i, o)| SmartObjective {
            id: EntityId::generated("obj", millis, i),
            text: o.text,
            indicators: o.indicators,
            sources: o.sources,
            erasmus_priority: o.erasmus_priority,
        })
        .collect();

    let mut next = state.clone();
    next.selected_objective_ids = objectives.iter().map(|o| o.id.clone()).collect();
    next.objectives = objectives;
    next.objectives_generated = true;
    next.objectives_error = None;
    next.touched()
}

/// Replaces one objective in place, keeping its id and position.
pub fn apply_regenerated_objective(
    state: &ConceptState,
    objective_id: &EntityId,
    regenerated: RegeneratedObjective,
) -> Result<ConceptState, ValidationError> {
    let replacement = regenerated.objective;
    if replacement.text.trim().is_empty() {
        return Err(ValidationError::empty_field("objective.text"));
    }

    let mut next = state.clone();
    let target = next
        .objectives
        .iter_mut()
        .find(|o| &o.id == objective_id)
        .ok_or_else(|| ValidationError::precondition(format!("Unknown objective {}", objective_id)))?;

    target.text = replacement.text;
    target.indicators = replacement.indicators;
    target.sources = replacement.sources;
    if replacement.erasmus_priority.is_some() {
        target.erasmus_priority = replacement.erasmus_priority;
    }
    next.objectives_error = None;
    Ok(next.touched())
}

// ════════════════════════════════════════════════════════════════════════════════
// Step 5: work packages
// ════════════════════════════════════════════════════════════════════════════════

/// Replaces the work packages and numbers them `1..=n` in the order the
/// model listed them. The model's own numbers are discarded; every package
/// starts selected.
pub fn apply_work_packages(state: &ConceptState, generated: GeneratedWorkPackages) -> ConceptState {
    let work_packages: Vec<WorkPackageSuggestion> = generated
        .work_packages
        .into_iter()
        .zip(1u32..)
        .map(|(mut wp, number)| {
            wp.number = number;
            wp
        })
        .collect();

    let mut next = state.clone();
    next.selected_wp_numbers = work_packages.iter().map(|wp| wp.number).collect();
    next.work_packages = work_packages;
    next.wp_generated = true;
    next.wp_error = None;
    next.touched()
}

// ════════════════════════════════════════════════════════════════════════════════
// Step 6: summary
// ════════════════════════════════════════════════════════════════════════════════

pub fn apply_detailed_concept(state: &ConceptState, markdown: &str) -> ConceptState {
    let mut next = state.clone();
    next.detailed_concept = Some(strip_markdown_fence(markdown, "markdown"));
    next.detailed_concept_error = None;
    next.translated_concept = None;
    next.touched()
}

/// Translation needs a drafted concept.
pub fn require_detailed_concept(state: &ConceptState) -> Result<&str, ValidationError> {
    state
        .detailed_concept
        .as_deref()
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| ValidationError::precondition("Generate the detailed concept first."))
}

pub fn apply_translation(state: &ConceptState, markdown: &str) -> ConceptState {
    let mut next = state.clone();
    next.translated_concept = Some(strip_markdown_fence(markdown, "markdown"));
    next.translation_error = None;
    next.touched()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::concept::state::{MonthSpan, ResearchSource, SourceKind};
    use crate::domain::foundation::SessionId;
    use serde_json::json;

    fn base() -> ConceptState {
        let mut state = ConceptState::new(SessionId::new());
        state.idea = "Green skills for rural adults".into();
        state.problem = "Rural adults miss out on green jobs".into();
        state
    }

    fn wp(number: u32) -> WorkPackageSuggestion {
        WorkPackageSuggestion {
            number,
            title: format!("WP{}", number),
            kind: "DEVELOPMENT".into(),
            description: String::new(),
            activities: vec![],
            deliverables: vec![],
            duration: MonthSpan { start: 1, end: 24 },
            lead: "Partner A".into(),
        }
    }

    #[test]
    fn enhancement_fallback_keeps_raw_text() {
        let next = apply_enhancement_fallback(&base());
        assert!(next.is_enhanced);
        assert_eq!(next.enhanced_idea.as_deref(), Some("Green skills for rural adults"));
    }

    #[test]
    fn enhanced_idea_requires_both_keys() {
        let parsed: Result<EnhancedIdea, _> =
            serde_json::from_value(json!({"enhancedIdea": "only one"}));
        assert!(parsed.is_err());
    }

    #[test]
    fn concepts_get_generated_ids_and_reset_selection() {
        let mut state = base();
        state.selected_concept_id = Some(EntityId::from("old"));
        let generated: GeneratedConcepts = serde_json::from_value(json!({
            "concepts": [{"title": "A"}, {"title": "B"}]
        }))
        .unwrap();

        let next = apply_concepts(&state, generated, Timestamp::from_millis(1_700_000_000_000));
        assert_eq!(next.concepts[1].id.as_str(), "concept_1700000000000_1");
        assert!(next.concepts.iter().all(|c| !c.selected && !c.saved_for_later));
        assert!(next.concepts_generated);
        assert!(next.selected_concept_id.is_none());
    }

    #[test]
    fn failure_leaves_content_untouched() {
        let mut state = base();
        state.objectives = vec![SmartObjective {
            id: EntityId::from("obj_1"),
            text: "Train 200 adults".into(),
            indicators: vec![],
            sources: vec![],
            erasmus_priority: None,
        }];
        let next = record_failure(&state, &ErrorScope::Objectives, "Generation failed");
        assert_eq!(next.objectives, state.objectives);
        assert_eq!(next.objectives_error.as_deref(), Some("Generation failed"));
    }

    #[test]
    fn objectives_are_all_selected_by_default() {
        let generated: GeneratedObjectives = serde_json::from_value(json!({
            "objectives": [{"text": "One"}, {"text": "Two"}, {"text": "Three"}]
        }))
        .unwrap();
        let next = apply_objectives(&base(), generated, Timestamp::from_millis(5));
        assert_eq!(
            next.selected_objective_ids,
            vec![EntityId::from("obj_5_0"), EntityId::from("obj_5_1"), EntityId::from("obj_5_2")]
        );
        assert!(next.objectives_generated);
    }

    #[test]
    fn regenerated_objective_keeps_id_and_position() {
        let generated: GeneratedObjectives = serde_json::from_value(json!({
            "objectives": [
                {"text": "One", "erasmusPriority": "Inclusion"},
                {"text": "Two"}
            ]
        }))
        .unwrap();
        let state = apply_objectives(&base(), generated, Timestamp::from_millis(9));
        let regenerated: RegeneratedObjective = serde_json::from_value(json!({
            "objective": {"text": "One, but measurable", "indicators": ["80% completion"]}
        }))
        .unwrap();

        let next = apply_regenerated_objective(&state, &EntityId::from("obj_9_0"), regenerated).unwrap();
        assert_eq!(next.objectives[0].id.as_str(), "obj_9_0");
        assert_eq!(next.objectives[0].text, "One, but measurable");
        assert_eq!(next.objectives[0].erasmus_priority.as_deref(), Some("Inclusion"));
        assert_eq!(next.objectives[1].text, "Two");
    }

    #[test]
    fn regenerated_objective_needs_text() {
        let regenerated: RegeneratedObjective =
            serde_json::from_value(json!({"objective": {"text": ""}})).unwrap();
        assert!(apply_regenerated_objective(&base(), &EntityId::from("x"), regenerated).is_err());
    }

    #[test]
    fn work_packages_select_every_number() {
        let next = apply_work_packages(
            &base(),
            GeneratedWorkPackages {
                work_packages: vec![wp(1), wp(2)],
            },
        );
        assert_eq!(next.selected_wp_numbers, vec![1, 2]);
        assert!(next.wp_generated);
    }

    #[test]
    fn rerunning_work_packages_replaces_instead_of_appending() {
        let first = apply_work_packages(&base(), GeneratedWorkPackages { work_packages: vec![wp(1), wp(2), wp(3)] });
        let second = apply_work_packages(&first, GeneratedWorkPackages { work_packages: vec![wp(1)] });
        assert_eq!(second.work_packages.len(), 1);
        assert_eq!(second.selected_wp_numbers, vec![1]);
    }

    #[test]
    fn work_packages_are_renumbered_in_listed_order() {
        let next = apply_work_packages(
            &base(),
            GeneratedWorkPackages {
                work_packages: vec![wp(1), wp(1), wp(7)],
            },
        );
        let numbers: Vec<u32> = next.work_packages.iter().map(|w| w.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(next.selected_wp_numbers, vec![1, 2, 3]);
        assert_eq!(next.work_packages[2].title, "WP7");
    }

    #[test]
    fn work_packages_without_number_parse_and_get_one() {
        let generated: GeneratedWorkPackages = serde_json::from_value(json!({
            "workPackages": [
                {"title": "Management", "type": "MANAGEMENT", "duration": {"start": 1, "end": 24}},
                {"title": "Curriculum", "duration": {"start": 3, "end": 18}}
            ]
        }))
        .unwrap();
        let next = apply_work_packages(&base(), generated);
        assert_eq!(next.selected_wp_numbers, vec![1, 2]);
        assert_eq!(next.work_packages[1].title, "Curriculum");
    }

    #[test]
    fn source_analysis_lifecycle() {
        let mut state = base();
        let id = EntityId::from("src_1");
        state.sources.push(ResearchSource::new(id.clone(), "OECD Skills Outlook", "Long text", SourceKind::Report));

        let analyzing = begin_source_analysis(&state, &id).unwrap();
        assert!(analyzing.sources[0].is_analyzing);

        let failed = record_failure(&analyzing, &ErrorScope::Source(id.clone()), ANALYSIS_FAILED_MESSAGE);
        assert!(!failed.sources[0].is_analyzing);
        assert_eq!(failed.sources[0].error.as_deref(), Some(ANALYSIS_FAILED_MESSAGE));

        let analyzed = apply_source_analysis(
            &begin_source_analysis(&failed, &id).unwrap(),
            &id,
            SourceAnalysis { summary: "Adults lag behind".into(), key_findings: vec!["44% lack skills".into()] },
        );
        let source = &analyzed.sources[0];
        assert!(source.is_analyzed && !source.is_analyzing);
        assert!(source.error.is_none());
    }

    #[test]
    fn source_without_content_cannot_be_analyzed() {
        let mut state = base();
        let id = EntityId::from("src_1");
        state.sources.push(ResearchSource::new(id.clone(), "Empty", "", SourceKind::Other));
        assert!(begin_source_analysis(&state, &id).is_err());
        assert!(begin_source_analysis(&state, &EntityId::from("missing")).is_err());
    }

    #[test]
    fn detailed_concept_strips_markdown_fence() {
        let next = apply_detailed_concept(&base(), "```markdown\n# 1. Relevance\nText\n```");
        assert_eq!(next.detailed_concept.as_deref(), Some("# 1. Relevance\nText"));
        assert!(require_detailed_concept(&next).is_ok());
        assert!(require_detailed_concept(&base()).is_err());
    }

    #[test]
    fn comparison_needs_two_concepts() {
        assert!(ensure_comparable(&base()).is_err());
    }

    #[test]
    fn selected_concept_is_required() {
        let err = require_selected_concept(&base()).unwrap_err();
        assert_eq!(err, ValidationError::precondition(SELECT_CONCEPT_FIRST));
    }
}
