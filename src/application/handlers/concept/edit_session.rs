//! EditConceptSessionHandler - Command handler for user edits.

use std::sync::Arc;

use super::ConceptSessionError;
use crate::domain::concept::{apply_edit, ConceptEdit, ConceptState};
use crate::domain::foundation::{SessionId, Timestamp};
use crate::ports::StateStorage;

/// Command to apply one user edit to a session.
#[derive(Debug, Clone)]
pub struct EditConceptSessionCommand {
    pub session_id: SessionId,
    pub edit: ConceptEdit,
}

/// Handler for user edits.
pub struct EditConceptSessionHandler {
    storage: Arc<dyn StateStorage>,
}

impl EditConceptSessionHandler {
    pub fn new(storage: Arc<dyn StateStorage>) -> Self {
        Self { storage }
    }

    pub async fn handle(
        &self,
        cmd: EditConceptSessionCommand,
    ) -> Result<ConceptState, ConceptSessionError> {
        let state = self.storage.load_state(cmd.session_id).await?;
        let next = apply_edit(&state, cmd.edit, Timestamp::now())?;
        self.storage.save_state(&next).await?;
        Ok(next)
    }
}
