//! State Storage Port - Interface for persisting concept sessions.
//!
//! A concept session is saved as a whole after every accepted change and
//! loaded again for the next request.

use async_trait::async_trait;

use crate::domain::concept::ConceptState;
use crate::domain::foundation::SessionId;

/// Errors that can occur during state storage operations
#[derive(Debug, thiserror::Error)]
pub enum StateStorageError {
    #[error("State not found for session: {0}")]
    NotFound(SessionId),

    #[error("Failed to serialize state: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize state: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Port for persisting and loading concept sessions
#[async_trait]
pub trait StateStorage: Send + Sync {
    /// Save a session, replacing any previous version
    ///
    /// # Errors
    /// Returns `StateStorageError` if save fails
    async fn save_state(&self, state: &ConceptState) -> Result<(), StateStorageError>;

    /// Load a session
    ///
    /// # Errors
    /// Returns `StateStorageError::NotFound` if no state exists
    async fn load_state(&self, session_id: SessionId) -> Result<ConceptState, StateStorageError>;

    /// Check if a session exists
    async fn exists(&self, session_id: SessionId) -> Result<bool, StateStorageError>;

    /// Delete a session. Deleting a missing session is not an error.
    async fn delete(&self, session_id: SessionId) -> Result<(), StateStorageError>;
}
