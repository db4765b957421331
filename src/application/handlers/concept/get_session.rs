//! GetConceptSessionHandler - Query handler for reading a concept session.

use std::sync::Arc;

use super::ConceptSessionError;
use crate::domain::concept::{can_proceed, ConceptState};
use crate::domain::foundation::SessionId;
use crate::ports::StateStorage;

/// Query for a concept session.
#[derive(Debug, Clone)]
pub struct GetConceptSessionQuery {
    pub session_id: SessionId,
}

/// The stored session plus whether its current step is complete.
#[derive(Debug, Clone)]
pub struct GetConceptSessionResult {
    pub state: ConceptState,
    pub can_proceed: bool,
}

/// Handler for reading concept sessions.
pub struct GetConceptSessionHandler {
    storage: Arc<dyn StateStorage>,
}

impl GetConceptSessionHandler {
    pub fn new(storage: Arc<dyn StateStorage>) -> Self {
        Self { storage }
    }

    pub async fn handle(
        &self,
        query: GetConceptSessionQuery,
    ) -> Result<GetConceptSessionResult, ConceptSessionError> {
        let state = self.storage.load_state(query.session_id).await?;
        let can_proceed = can_proceed(&state, state.current_step);
        Ok(GetConceptSessionResult { state, can_proceed })
    }
}
