//! File-based State Storage Adapter
//!
//! Stores each concept session as one pretty-printed JSON file,
//! `{base_path}/{session_id}.json`.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::concept::ConceptState;
use crate::domain::foundation::SessionId;
use crate::ports::{StateStorage, StateStorageError};

/// File-based storage for concept sessions
#[derive(Debug, Clone)]
pub struct FileStateStorage {
    base_path: PathBuf,
}

impl FileStateStorage {
    /// Create a new file storage with a base directory
    ///
    /// # Example
    /// ```ignore
    /// let storage = FileStateStorage::new("./data/sessions");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Get the state file path for a session
    fn state_file_path(&self, session_id: SessionId) -> PathBuf {
        self.base_path.join(format!("{}.json", session_id))
    }

    /// Ensure directory exists
    async fn ensure_dir(&self, path: &Path) -> Result<(), StateStorageError> {
        fs::create_dir_all(path)
            .await
            .map_err(|e| StateStorageError::IoError(e.to_string()))
    }
}

#[async_trait]
impl StateStorage for FileStateStorage {
    async fn save_state(&self, state: &ConceptState) -> Result<(), StateStorageError> {
        self.ensure_dir(&self.base_path).await?;

        let json = serde_json::to_string_pretty(state)
            .map_err(|e| StateStorageError::SerializationFailed(e.to_string()))?;

        // Write next to the target, then rename over it.
        let file_path = self.state_file_path(state.session_id);
        let tmp_path = file_path.with_extension("json.tmp");
        fs::write(&tmp_path, json)
            .await
            .map_err(|e| StateStorageError::IoError(e.to_string()))?;
        fs::rename(&tmp_path, &file_path)
            .await
            .map_err(|e| StateStorageError::IoError(e.to_string()))?;

        tracing::debug!(session_id = %state.session_id, "Saved concept session");
        Ok(())
    }

    async fn load_state(&self, session_id: SessionId) -> Result<ConceptState, StateStorageError> {
        let file_path = self.state_file_path(session_id);

        let json = match fs::read_to_string(&file_path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StateStorageError::NotFound(session_id));
            }
            Err(e) => return Err(StateStorageError::IoError(e.to_string())),
        };

        serde_json::from_str(&json)
            .map_err(|e| StateStorageError::DeserializationFailed(e.to_string()))
    }

    async fn exists(&self, session_id: SessionId) -> Result<bool, StateStorageError> {
        fs::try_exists(self.state_file_path(session_id))
            .await
            .map_err(|e| StateStorageError::IoError(e.to_string()))
    }

    async fn delete(&self, session_id: SessionId) -> Result<(), StateStorageError> {
        match fs::remove_file(self.state_file_path(session_id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StateStorageError::IoError(e.to_string())),
        }
    }
}
