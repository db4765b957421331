//! DeleteConceptSessionHandler - Command handler for discarding a session.

use std::sync::Arc;

use super::ConceptSessionError;
use crate::domain::foundation::SessionId;
use crate::ports::StateStorage;

/// Command to delete a session.
#[derive(Debug, Clone)]
pub struct DeleteConceptSessionCommand {
    pub session_id: SessionId,
}

/// Handler for deleting sessions.
pub struct DeleteConceptSessionHandler {
    storage: Arc<dyn StateStorage>,
}

impl DeleteConceptSessionHandler {
    pub fn new(storage: Arc<dyn StateStorage>) -> Self {
        Self { storage }
    }

    /// Fails with `NotFound` when there is nothing to delete.
    pub async fn handle(&self, cmd: DeleteConceptSessionCommand) -> Result<(), ConceptSessionError> {
        if !self.storage.exists(cmd.session_id).await? {
            return Err(ConceptSessionError::NotFound(cmd.session_id));
        }
        self.storage.delete(cmd.session_id).await?;
        tracing::info!(session_id = %cmd.session_id, "Concept session deleted");
        Ok(())
    }
}
