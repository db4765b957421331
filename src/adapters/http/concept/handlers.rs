//! HTTP handlers for concept session endpoints.
//!
//! These handlers connect Axum routes to the concept command/query handlers.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::api_key::ApiKeyOverride;
use crate::adapters::http::error::ErrorResponse;
use crate::application::handlers::concept::{
    ConceptSessionError, CreateConceptSessionCommand, CreateConceptSessionHandler,
    DeleteConceptSessionCommand, DeleteConceptSessionHandler, EditConceptSessionCommand,
    EditConceptSessionHandler, ExportProjectCommand, ExportProjectHandler,
    GetConceptSessionHandler, GetConceptSessionQuery, NavigateConceptStepCommand,
    NavigateConceptStepHandler, RunGenerationCommand, RunGenerationHandler,
};
use crate::domain::concept::{ConceptEdit, IdeaFields};
use crate::domain::foundation::{SessionId, ValidationError};
use crate::ports::{AIProvider, StateStorage};

use super::dto::{ExportResponse, GenerateRequest, GenerateResponse, NavigateRequest, SessionResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Dependencies shared by the concept endpoints.
#[derive(Clone)]
pub struct ConceptAppState {
    pub storage: Arc<dyn StateStorage>,
    pub ai_provider: Arc<dyn AIProvider>,
}

impl ConceptAppState {
    pub fn new(storage: Arc<dyn StateStorage>, ai_provider: Arc<dyn AIProvider>) -> Self {
        Self {
            storage,
            ai_provider,
        }
    }

    pub fn create_handler(&self) -> CreateConceptSessionHandler {
        CreateConceptSessionHandler::new(self.storage.clone())
    }

    pub fn get_handler(&self) -> GetConceptSessionHandler {
        GetConceptSessionHandler::new(self.storage.clone())
    }

    pub fn edit_handler(&self) -> EditConceptSessionHandler {
        EditConceptSessionHandler::new(self.storage.clone())
    }

    pub fn navigate_handler(&self) -> NavigateConceptStepHandler {
        NavigateConceptStepHandler::new(self.storage.clone())
    }

    pub fn generation_handler(&self) -> RunGenerationHandler<dyn AIProvider> {
        RunGenerationHandler::new(self.storage.clone(), self.ai_provider.clone())
    }

    pub fn export_handler(&self) -> ExportProjectHandler {
        ExportProjectHandler::new(self.storage.clone())
    }

    pub fn delete_handler(&self) -> DeleteConceptSessionHandler {
        DeleteConceptSessionHandler::new(self.storage.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/concepts - Start a session, optionally with step 1 filled in
pub async fn create_session(
    State(state): State<ConceptAppState>,
    Json(idea): Json<IdeaFields>,
) -> Result<impl IntoResponse, ConceptApiError> {
    let session = state
        .create_handler()
        .handle(CreateConceptSessionCommand { idea })
        .await?;
    Ok((StatusCode::CREATED, Json(SessionResponse::from(session))))
}

/// GET /api/concepts/:session_id
pub async fn get_session(
    State(state): State<ConceptAppState>,
    Path(session_id): Path<SessionId>,
) -> Result<impl IntoResponse, ConceptApiError> {
    let result = state
        .get_handler()
        .handle(GetConceptSessionQuery { session_id })
        .await?;
    Ok(Json(SessionResponse::from(result)))
}

/// PUT /api/concepts/:session_id - Apply one user edit
pub async fn edit_session(
    State(state): State<ConceptAppState>,
    Path(session_id): Path<SessionId>,
    Json(edit): Json<ConceptEdit>,
) -> Result<impl IntoResponse, ConceptApiError> {
    let session = state
        .edit_handler()
        .handle(EditConceptSessionCommand { session_id, edit })
        .await?;
    Ok(Json(SessionResponse::from(session)))
}

/// POST /api/concepts/:session_id/navigate
pub async fn navigate_step(
    State(state): State<ConceptAppState>,
    Path(session_id): Path<SessionId>,
    Json(request): Json<NavigateRequest>,
) -> Result<impl IntoResponse, ConceptApiError> {
    let session = state
        .navigate_handler()
        .handle(NavigateConceptStepCommand {
            session_id,
            target: request.step,
        })
        .await?;
    Ok(Json(SessionResponse::from(session)))
}

/// POST /api/concepts/:session_id/generate
///
/// Model failures do not fail the request: the step error is stored in the
/// session and reported in `outcome`.
pub async fn run_generation(
    State(state): State<ConceptAppState>,
    Path(session_id): Path<SessionId>,
    ApiKeyOverride(api_key): ApiKeyOverride,
    Json(request): Json<GenerateRequest>,
) -> Result<impl IntoResponse, ConceptApiError> {
    let result = state
        .generation_handler()
        .handle(RunGenerationCommand {
            session_id,
            operation: request.operation,
            language: request.language,
            api_key,
        })
        .await?;
    Ok(Json(GenerateResponse::from(result)))
}

/// POST /api/concepts/:session_id/export
pub async fn export_project(
    State(state): State<ConceptAppState>,
    Path(session_id): Path<SessionId>,
) -> Result<impl IntoResponse, ConceptApiError> {
    let result = state
        .export_handler()
        .handle(ExportProjectCommand { session_id })
        .await?;
    Ok(Json(ExportResponse::from(result)))
}

/// DELETE /api/concepts/:session_id
pub async fn delete_session(
    State(state): State<ConceptAppState>,
    Path(session_id): Path<SessionId>,
) -> Result<impl IntoResponse, ConceptApiError> {
    state
        .delete_handler()
        .handle(DeleteConceptSessionCommand { session_id })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error wrapper for concept session errors.
#[derive(Debug)]
pub struct ConceptApiError(ConceptSessionError);

impl From<ConceptSessionError> for ConceptApiError {
    fn from(err: ConceptSessionError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ConceptApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match &self.0 {
            ConceptSessionError::NotFound(id) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::with_details(
                    "SESSION_NOT_FOUND",
                    self.0.to_string(),
                    serde_json::json!({ "sessionId": id.to_string() }),
                ),
            ),
            ConceptSessionError::Validation(err) => {
                let code = match err {
                    ValidationError::Precondition(_) => "STEP_PRECONDITION",
                    _ => "VALIDATION_FAILED",
                };
                (StatusCode::BAD_REQUEST, ErrorResponse::new(code, err.to_string()))
            }
            ConceptSessionError::Storage(_) => {
                tracing::error!(error = %self.0, "Concept session storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("STORAGE_ERROR", "Session storage failed"),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::adapters::storage::InMemoryStateStorage;
    use crate::domain::concept::ConceptState;

    fn test_state() -> (Arc<InMemoryStateStorage>, ConceptAppState) {
        let storage = Arc::new(InMemoryStateStorage::new());
        let state = ConceptAppState::new(storage.clone(), Arc::new(MockAIProvider::new()));
        (storage, state)
    }

    #[tokio::test]
    async fn get_unknown_session_is_404() {
        let (_, state) = test_state();
        let result = get_session(State(state), Path(SessionId::new())).await;
        let response = match result {
            Ok(_) => panic!("expected an error"),
            Err(err) => err.into_response(),
        };
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_existing_session_is_204() {
        let (storage, state) = test_state();
        let session = ConceptState::new(SessionId::new());
        storage.save_state(&session).await.unwrap();

        let response = delete_session(State(state), Path(session.session_id))
            .await
            .unwrap()
            .into_response();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[test]
    fn precondition_failures_are_400() {
        let err = ConceptApiError(ConceptSessionError::Validation(ValidationError::precondition(
            "Select a concept first",
        )));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn storage_failures_are_500() {
        let err = ConceptApiError(ConceptSessionError::Storage("disk full".into()));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
