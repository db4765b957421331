//! HTTP DTOs for concept session endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::concept::{
    ExportProjectResult, GenerationOperation, GenerationOutcome, GetConceptSessionResult,
    RunGenerationResult,
};
use crate::domain::concept::{can_proceed, ConceptState};
use crate::domain::foundation::ConceptStep;
use crate::domain::proposal::Project;
use crate::domain::validation::ValidationSummary;

pub(crate) fn default_language() -> String {
    "en".to_string()
}

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to move a session to another step.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateRequest {
    pub step: ConceptStep,
}

/// Request to run a generation operation.
///
/// The operation is tagged inline, e.g.
/// `{"operation": "analyze_source", "sourceId": "src_1", "language": "de"}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(flatten)]
    pub operation: GenerationOperation,
    #[serde(default = "default_language")]
    pub language: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// A session together with whether its current step is complete.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session: ConceptState,
    pub can_proceed: bool,
}

impl From<ConceptState> for SessionResponse {
    fn from(session: ConceptState) -> Self {
        let can_proceed = can_proceed(&session, session.current_step);
        Self {
            session,
            can_proceed,
        }
    }
}

impl From<GetConceptSessionResult> for SessionResponse {
    fn from(result: GetConceptSessionResult) -> Self {
        Self {
            session: result.state,
            can_proceed: result.can_proceed,
        }
    }
}

/// Session after a generation step, with how the step ended.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(flatten)]
    pub session: SessionResponse,
    pub outcome: GenerationOutcome,
}

impl From<RunGenerationResult> for GenerateResponse {
    fn from(result: RunGenerationResult) -> Self {
        Self {
            session: SessionResponse::from(result.state),
            outcome: result.outcome,
        }
    }
}

/// Draft project exported from a session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    pub project: Project,
    pub validation: ValidationSummary,
}

impl From<ExportProjectResult> for ExportResponse {
    fn from(result: ExportProjectResult) -> Self {
        Self {
            project: result.project,
            validation: result.validation,
        }
    }
}
