//! Axum router configuration for concept session endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    create_session, delete_session, edit_session, export_project, get_session, navigate_step,
    run_generation, ConceptAppState,
};

/// Create the concept session router, mounted at `/api/concepts`.
///
/// # Routes
/// - `POST /` - Start a session
/// - `GET /:session_id` - Read a session
/// - `PUT /:session_id` - Apply a user edit
/// - `DELETE /:session_id` - Discard a session
/// - `POST /:session_id/navigate` - Move to another step
/// - `POST /:session_id/generate` - Run a generation operation
/// - `POST /:session_id/export` - Export as a draft project
pub fn concept_routes() -> Router<ConceptAppState> {
    Router::new()
        .route("/", post(create_session))
        .route(
            "/:session_id",
            get(get_session).put(edit_session).delete(delete_session),
        )
        .route("/:session_id/navigate", post(navigate_step))
        .route("/:session_id/generate", post(run_generation))
        .route("/:session_id/export", post(export_project))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::adapters::ai::MockAIProvider;
    use crate::adapters::storage::InMemoryStateStorage;

    #[test]
    fn concept_routes_creates_router() {
        let state = ConceptAppState::new(
            Arc::new(InMemoryStateStorage::new()),
            Arc::new(MockAIProvider::new()),
        );
        let _: Router<()> = concept_routes().with_state(state);
    }
}
