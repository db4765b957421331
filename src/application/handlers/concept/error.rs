//! Error shared by the concept session handlers.

use crate::domain::foundation::{SessionId, ValidationError};
use crate::ports::StateStorageError;

/// Error type for concept session commands and queries
#[derive(Debug, Clone, PartialEq)]
pub enum ConceptSessionError {
    /// Session not found
    NotFound(SessionId),
    /// Storage error
    Storage(String),
    /// Input or step precondition rejected before any model call
    Validation(ValidationError),
}

impl std::fmt::Display for ConceptSessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConceptSessionError::NotFound(id) => write!(f, "Concept session not found: {}", id),
            ConceptSessionError::Storage(err) => write!(f, "Storage error: {}", err),
            ConceptSessionError::Validation(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ConceptSessionError {}

impl From<StateStorageError> for ConceptSessionError {
    fn from(err: StateStorageError) -> Self {
        match err {
            StateStorageError::NotFound(session_id) => ConceptSessionError::NotFound(session_id),
            other => ConceptSessionError::Storage(other.to_string()),
        }
    }
}

impl From<ValidationError> for ConceptSessionError {
    fn from(err: ValidationError) -> Self {
        ConceptSessionError::Validation(err)
    }
}
