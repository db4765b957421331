//! CreateConceptSessionHandler - Command handler for starting a concept session.

use std::sync::Arc;

use super::ConceptSessionError;
use crate::domain::concept::{apply_edit, ConceptEdit, ConceptState, IdeaFields};
use crate::domain::foundation::{SessionId, Timestamp};
use crate::ports::StateStorage;

/// Command to create a new concept session, optionally pre-filling step 1.
#[derive(Debug, Clone, Default)]
pub struct CreateConceptSessionCommand {
    pub idea: IdeaFields,
}

/// Handler for creating concept sessions.
pub struct CreateConceptSessionHandler {
    storage: Arc<dyn StateStorage>,
}

impl CreateConceptSessionHandler {
    pub fn new(storage: Arc<dyn StateStorage>) -> Self {
        Self { storage }
    }

    pub async fn handle(
        &self,
        cmd: CreateConceptSessionCommand,
    ) -> Result<ConceptState, ConceptSessionError> {
        let empty = ConceptState::new(SessionId::new());
        let state = apply_edit(&empty, ConceptEdit::UpdateIdea(cmd.idea), Timestamp::now())?;

        self.storage.save_state(&state).await?;
        tracing::info!(session_id = %state.session_id, "Concept session created");

        Ok(state)
    }
}
