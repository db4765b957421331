//! RunGenerationHandler - Runs one model-backed step of a concept session.
//!
//! Each operation follows the same sequence: check preconditions, build the
//! prompt, call the model, normalize the answer, fold it into the state and
//! save. Precondition failures are returned before any model call. Model,
//! parse and shape failures never escape: they become a step-scoped message
//! in the saved state and the earlier step output stays untouched.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::ConceptSessionError;
use crate::domain::concept::{
    apply_comparison, apply_concepts, apply_detailed_concept, apply_enhanced_idea,
    apply_enhancement_fallback, apply_objectives, apply_regenerated_objective,
    apply_source_analysis, apply_translation, apply_work_packages, begin_source_analysis,
    ensure_comparable, record_failure, require_detailed_concept, require_selected_concept,
    ConceptComparison, ConceptState, EnhancedIdea, ErrorScope, GeneratedConcepts,
    GeneratedObjectives, GeneratedWorkPackages, RegeneratedObjective, SourceAnalysis,
    ANALYSIS_FAILED_MESSAGE,
};
use crate::domain::foundation::{EntityId, SessionId, Timestamp, ValidationError};
use crate::domain::normalizer::{normalize_as, ParseError};
use crate::domain::prompts::{
    analyze_source_prompt, compare_concepts_prompt, detailed_concept_prompt,
    enhance_idea_prompt, generate_concepts_prompt, generate_objectives_prompt,
    generate_work_packages_prompt, regenerate_objective_prompt, translate_concept_prompt, Prompt,
};
use crate::ports::{AIError, AIProvider, CompletionRequest, StateStorage};

pub const RATE_LIMITED_MESSAGE: &str = "API rate limit reached (429). Please wait 1-2 minutes.";
pub const TIMED_OUT_MESSAGE: &str = "The request timed out. Please try again.";
pub const MISSING_KEY_MESSAGE: &str = "Gemini API key not configured.";

/// A model-backed step of the concept workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum GenerationOperation {
    EnhanceIdea,
    AnalyzeSource { source_id: EntityId },
    GenerateConcepts,
    CompareConcepts,
    GenerateObjectives,
    RegenerateObjective { objective_id: EntityId },
    GenerateWorkPackages,
    GenerateDetailedConcept,
    TranslateConcept,
}

impl GenerationOperation {
    fn label(&self) -> &'static str {
        match self {
            GenerationOperation::EnhanceIdea => "Idea enhancement",
            GenerationOperation::AnalyzeSource { .. } => "Source analysis",
            GenerationOperation::GenerateConcepts => "Concept generation",
            GenerationOperation::CompareConcepts => "Concept comparison",
            GenerationOperation::GenerateObjectives => "Objective generation",
            GenerationOperation::RegenerateObjective { .. } => "Objective regeneration",
            GenerationOperation::GenerateWorkPackages => "Work package generation",
            GenerationOperation::GenerateDetailedConcept => "Concept drafting",
            GenerationOperation::TranslateConcept => "Concept translation",
        }
    }
}

/// Command to run a generation operation.
#[derive(Debug, Clone)]
pub struct RunGenerationCommand {
    pub session_id: SessionId,
    pub operation: GenerationOperation,
    /// Output language code for prompts that produce user-facing prose.
    pub language: String,
    /// Caller-supplied model key, used instead of the configured ones.
    pub api_key: Option<String>,
}

/// How the operation ended; the state is saved in every case.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationOutcome {
    Completed,
    /// The step produced a fallback instead of model output.
    Degraded { message: String },
    /// The step error field was set and earlier output kept.
    Failed { message: String },
}

/// Result of running a generation operation.
#[derive(Debug, Clone)]
pub struct RunGenerationResult {
    pub state: ConceptState,
    pub outcome: GenerationOutcome,
}

/// Why a model call did not produce usable output.
#[derive(Debug)]
enum GenerationFailure {
    Model(AIError),
    Parse(ParseError),
    Shape(ValidationError),
}

impl GenerationFailure {
    fn user_message(&self, label: &str) -> String {
        match self {
            GenerationFailure::Model(AIError::RateLimited { .. }) => RATE_LIMITED_MESSAGE.to_string(),
            GenerationFailure::Model(AIError::TimedOut { .. }) => TIMED_OUT_MESSAGE.to_string(),
            GenerationFailure::Model(AIError::MissingApiKey) => MISSING_KEY_MESSAGE.to_string(),
            GenerationFailure::Model(err) => format!("{} failed: {}", label, err),
            GenerationFailure::Parse(_) => format!(
                "{} failed: the response could not be read. Please try again.",
                label
            ),
            GenerationFailure::Shape(err) => format!("{} failed: {}", label, err),
        }
    }
}

/// Handler for model-backed concept steps.
pub struct RunGenerationHandler<P: ?Sized + AIProvider> {
    storage: Arc<dyn StateStorage>,
    ai_provider: Arc<P>,
}

impl<P: ?Sized + AIProvider> RunGenerationHandler<P> {
    pub fn new(storage: Arc<dyn StateStorage>, ai_provider: Arc<P>) -> Self {
        Self {
            storage,
            ai_provider,
        }
    }

    pub async fn handle(
        &self,
        cmd: RunGenerationCommand,
    ) -> Result<RunGenerationResult, ConceptSessionError> {
        let state = self.storage.load_state(cmd.session_id).await?;
        let label = cmd.operation.label();
        let key = cmd.api_key.as_deref();
        let now = Timestamp::now();

        let (next, outcome) = match &cmd.operation {
            GenerationOperation::EnhanceIdea => {
                if state.idea.trim().is_empty() {
                    return Err(ValidationError::empty_field("idea").into());
                }
                match self.generate::<EnhancedIdea>(enhance_idea_prompt(&state), key).await {
                    Ok(enhanced) => (apply_enhanced_idea(&state, enhanced), GenerationOutcome::Completed),
                    Err(failure) => {
                        let message = failure.user_message(label);
                        tracing::warn!(session_id = %state.session_id, %message, "Idea enhancement fell back to raw text");
                        (
                            apply_enhancement_fallback(&state),
                            GenerationOutcome::Degraded { message },
                        )
                    }
                }
            }

            GenerationOperation::AnalyzeSource { source_id } => {
                let analyzing = begin_source_analysis(&state, source_id)?;
                self.storage.save_state(&analyzing).await?;
                let prompt = match analyzing.source(source_id) {
                    Some(source) => analyze_source_prompt(&source.title, &source.content),
                    None => {
                        return Err(ValidationError::precondition(format!(
                            "Unknown source {}",
                            source_id
                        ))
                        .into())
                    }
                };
                let result = self
                    .generate::<SourceAnalysis>(prompt, key)
                    .await
                    .map(|analysis| apply_source_analysis(&analyzing, source_id, analysis));
                match result {
                    Ok(next) => (next, GenerationOutcome::Completed),
                    Err(failure) => {
                        tracing::warn!(session_id = %state.session_id, %source_id, error = ?failure, "Source analysis failed");
                        let message = ANALYSIS_FAILED_MESSAGE.to_string();
                        (
                            record_failure(&analyzing, &ErrorScope::Source(source_id.clone()), message.clone()),
                            GenerationOutcome::Failed { message },
                        )
                    }
                }
            }

            GenerationOperation::GenerateConcepts => {
                if state.idea_text().trim().is_empty() {
                    return Err(ValidationError::empty_field("idea").into());
                }
                let prompt = generate_concepts_prompt(&state, &cmd.language);
                let result = self
                    .generate::<GeneratedConcepts>(prompt, key)
                    .await
                    .and_then(|generated| {
                        if generated.concepts.is_empty() {
                            return Err(GenerationFailure::Shape(ValidationError::empty_field("concepts")));
                        }
                        Ok(apply_concepts(&state, generated, now))
                    });
                self.settle(&state, ErrorScope::Concepts, label, result)
            }

            GenerationOperation::CompareConcepts => {
                ensure_comparable(&state)?;
                let result = self
                    .generate::<ConceptComparison>(compare_concepts_prompt(&state), key)
                    .await
                    .map(|comparison| apply_comparison(&state, comparison));
                self.settle(&state, ErrorScope::Comparison, label, result)
            }

            GenerationOperation::GenerateObjectives => {
                let concept = require_selected_concept(&state)?;
                let prompt = generate_objectives_prompt(&state, concept);
                let result = self
                    .generate::<GeneratedObjectives>(prompt, key)
                    .await
                    .map(|generated| apply_objectives(&state, generated, now));
                self.settle(&state, ErrorScope::Objectives, label, result)
            }

            GenerationOperation::RegenerateObjective { objective_id } => {
                let concept = require_selected_concept(&state)?;
                if !state.objectives.iter().any(|o| &o.id == objective_id) {
                    return Err(ValidationError::precondition(format!(
                        "Unknown objective {}",
                        objective_id
                    ))
                    .into());
                }
                let prompt = regenerate_objective_prompt(&state, concept, objective_id);
                let result = self
                    .generate::<RegeneratedObjective>(prompt, key)
                    .await
                    .and_then(|regenerated| {
                        apply_regenerated_objective(&state, objective_id, regenerated)
                            .map_err(GenerationFailure::Shape)
                    });
                self.settle(&state, ErrorScope::Objectives, label, result)
            }

            GenerationOperation::GenerateWorkPackages => {
                let concept = require_selected_concept(&state)?;
                let prompt = generate_work_packages_prompt(&state, concept);
                let result = self
                    .generate::<GeneratedWorkPackages>(prompt, key)
                    .await
                    .map(|generated| apply_work_packages(&state, generated));
                self.settle(&state, ErrorScope::WorkPackages, label, result)
            }

            GenerationOperation::GenerateDetailedConcept => {
                let concept = require_selected_concept(&state)?;
                let prompt = detailed_concept_prompt(&state, concept);
                let result = self
                    .generate_text(prompt, key)
                    .await
                    .map(|markdown| apply_detailed_concept(&state, &markdown));
                self.settle(&state, ErrorScope::DetailedConcept, label, result)
            }

            GenerationOperation::TranslateConcept => {
                let markdown = require_detailed_concept(&state)?;
                let prompt = translate_concept_prompt(markdown);
                let result = self
                    .generate_text(prompt, key)
                    .await
                    .map(|translated| apply_translation(&state, &translated));
                self.settle(&state, ErrorScope::Translation, label, result)
            }
        };

        self.storage.save_state(&next).await?;
        Ok(RunGenerationResult {
            state: next,
            outcome,
        })
    }

    /// Either the applied state, or the previous state with the step error written.
    fn settle(
        &self,
        state: &ConceptState,
        scope: ErrorScope,
        label: &str,
        result: Result<ConceptState, GenerationFailure>,
    ) -> (ConceptState, GenerationOutcome) {
        match result {
            Ok(next) => (next, GenerationOutcome::Completed),
            Err(failure) => {
                let message = failure.user_message(label);
                tracing::warn!(session_id = %state.session_id, scope = ?scope, error = ?failure, "{} failed", label);
                (
                    record_failure(state, &scope, message.clone()),
                    GenerationOutcome::Failed { message },
                )
            }
        }
    }

    async fn generate_text(&self, prompt: Prompt, api_key: Option<&str>) -> Result<String, GenerationFailure> {
        let request = CompletionRequest::from(prompt).with_api_key_override(api_key.map(str::to_string));
        let response = self
            .ai_provider
            .complete(request)
            .await
            .map_err(GenerationFailure::Model)?;
        if response.content.trim().is_empty() {
            return Err(GenerationFailure::Shape(ValidationError::empty_field("response")));
        }
        Ok(response.content)
    }

    async fn generate<T: DeserializeOwned>(&self, prompt: Prompt, api_key: Option<&str>) -> Result<T, GenerationFailure> {
        let raw = self.generate_text(prompt, api_key).await?;
        normalize_as::<T>(&raw).map_err(GenerationFailure::Parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::adapters::storage::InMemoryStateStorage;
    use crate::domain::concept::{ConceptProposal, ResearchSource, SourceKind, SELECT_CONCEPT_FIRST};
    use serde_json::json;

    struct Fixture {
        storage: Arc<InMemoryStateStorage>,
        provider: Arc<MockAIProvider>,
        handler: RunGenerationHandler<MockAIProvider>,
    }

    fn fixture(provider: MockAIProvider) -> Fixture {
        let storage = Arc::new(InMemoryStateStorage::new());
        let provider = Arc::new(provider);
        let handler = RunGenerationHandler::new(storage.clone(), provider.clone());
        Fixture {
            storage,
            provider,
            handler,
        }
    }

    fn idea_state() -> ConceptState {
        let mut state = ConceptState::new(SessionId::new());
        state.idea = "Maker spaces in public libraries for adult upskilling".into();
        state.target_group = "Unemployed adults".into();
        state.problem = "Adults without digital skills are excluded from jobs".into();
        state
    }

    fn with_selected_concept(mut state: ConceptState) -> ConceptState {
        state.concepts = vec![ConceptProposal {
            id: EntityId::from("concept_1_0"),
            title: "Library Makers".into(),
            acronym: "LIBMAKE".into(),
            summary: "Maker spaces".into(),
            problem_statement: "Skills gap".into(),
            innovation: "Libraries as hubs".into(),
            target_groups: vec!["Adults".into()],
            objectives: vec![],
            main_outputs: vec![],
            erasmus_priorities: vec![],
            selected: true,
            saved_for_later: false,
        }];
        state.selected_concept_id = Some(EntityId::from("concept_1_0"));
        state
    }

    fn command(state: &ConceptState, operation: GenerationOperation) -> RunGenerationCommand {
        RunGenerationCommand {
            session_id: state.session_id,
            operation,
            language: "en".into(),
            api_key: None,
        }
    }

    #[tokio::test]
    async fn enhancement_failure_degrades_to_raw_text() {
        let f = fixture(MockAIProvider::new().with_error(MockError::RateLimited { attempts: 2 }));
        let state = idea_state();
        f.storage.save_state(&state).await.unwrap();

        let result = f.handler.handle(command(&state, GenerationOperation::EnhanceIdea)).await.unwrap();

        assert_eq!(
            result.outcome,
            GenerationOutcome::Degraded {
                message: RATE_LIMITED_MESSAGE.into()
            }
        );
        assert_eq!(result.state.enhanced_idea.as_deref(), Some(state.idea.as_str()));
        assert!(result.state.is_enhanced);
    }

    #[tokio::test]
    async fn generated_work_packages_are_all_selected() {
        let f = fixture(MockAIProvider::new().with_json(json!({
            "workPackages": [
                {"number": 1, "title": "Management", "type": "MANAGEMENT", "description": "d",
                 "activities": [], "deliverables": [], "duration": {"start": 1, "end": 24}, "lead": "A"},
                {"number": 2, "title": "Training", "type": "DEVELOPMENT", "description": "d",
                 "activities": [], "deliverables": [], "duration": {"start": 3, "end": 20}, "lead": "B"}
            ]
        })));
        let state = with_selected_concept(idea_state());
        f.storage.save_state(&state).await.unwrap();

        let result = f
            .handler
            .handle(command(&state, GenerationOperation::GenerateWorkPackages))
            .await
            .unwrap();

        assert_eq!(result.outcome, GenerationOutcome::Completed);
        assert_eq!(result.state.selected_wp_numbers, vec![1, 2]);
        assert!(result.state.wp_generated);
        let stored = f.storage.load_state(state.session_id).await.unwrap();
        assert_eq!(stored.work_packages.len(), 2);
    }

    #[tokio::test]
    async fn objectives_without_selected_concept_fail_before_calling_model() {
        let f = fixture(MockAIProvider::new());
        let state = idea_state();
        f.storage.save_state(&state).await.unwrap();

        let result = f
            .handler
            .handle(command(&state, GenerationOperation::GenerateObjectives))
            .await;

        assert_eq!(
            result.unwrap_err(),
            ConceptSessionError::Validation(ValidationError::precondition(SELECT_CONCEPT_FIRST))
        );
        assert_eq!(f.provider.call_count(), 0);
    }

    #[tokio::test]
    async fn unparsable_answer_records_step_error_and_keeps_content() {
        let f = fixture(MockAIProvider::new().with_response("Sorry, I cannot help with that."));
        let mut state = with_selected_concept(idea_state());
        state.wp_generated = true;
        state.selected_wp_numbers = vec![];
        f.storage.save_state(&state).await.unwrap();

        let result = f
            .handler
            .handle(command(&state, GenerationOperation::GenerateWorkPackages))
            .await
            .unwrap();

        assert!(matches!(result.outcome, GenerationOutcome::Failed { .. }));
        assert!(result.state.wp_error.is_some());
        assert_eq!(result.state.work_packages, state.work_packages);
        let stored = f.storage.load_state(state.session_id).await.unwrap();
        assert!(stored.wp_error.is_some());
    }

    #[tokio::test]
    async fn source_analysis_failure_is_scoped_to_the_source() {
        let f = fixture(MockAIProvider::new().with_error(MockError::Upstream {
            status: 500,
            message: "internal".into(),
        }));
        let mut state = idea_state();
        state.sources.push(ResearchSource::new(
            EntityId::from("source_1_0"),
            "Eurostat adult learning",
            "Participation rates by country",
            SourceKind::Report,
        ));
        f.storage.save_state(&state).await.unwrap();

        let result = f
            .handler
            .handle(command(
                &state,
                GenerationOperation::AnalyzeSource {
                    source_id: EntityId::from("source_1_0"),
                },
            ))
            .await
            .unwrap();

        let source = &result.state.sources[0];
        assert_eq!(source.error.as_deref(), Some(ANALYSIS_FAILED_MESSAGE));
        assert!(!source.is_analyzing);
        assert!(!source.is_analyzed);
    }

    #[tokio::test]
    async fn api_key_override_is_forwarded() {
        let f = fixture(MockAIProvider::new().with_response("# Concept"));
        let state = with_selected_concept(idea_state());
        f.storage.save_state(&state).await.unwrap();

        let mut cmd = command(&state, GenerationOperation::GenerateDetailedConcept);
        cmd.api_key = Some("user-key".into());
        let result = f.handler.handle(cmd).await.unwrap();

        assert_eq!(result.state.detailed_concept.as_deref(), Some("# Concept"));
        assert!(f.provider.last_call().unwrap().api_key_override.is_some());
    }

    #[test]
    fn operations_parse_from_tagged_json() {
        let op: GenerationOperation = serde_json::from_value(json!({
            "operation": "regenerate_objective",
            "objectiveId": "obj_1_0"
        }))
        .unwrap();
        assert_eq!(
            op,
            GenerationOperation::RegenerateObjective {
                objective_id: EntityId::from("obj_1_0")
            }
        );
    }
}
