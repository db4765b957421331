//! Session storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where concept sessions are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one JSON file per session
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Keep sessions in process memory only
    #[serde(default)]
    pub in_memory: bool,
}

impl StorageConfig {
    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.in_memory && self.data_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingDataDir);
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            in_memory: false,
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data/sessions")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_defaults() {
        let config = StorageConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("data/sessions"));
        assert!(!config.in_memory);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_dir_allowed_only_in_memory() {
        let mut config = StorageConfig {
            data_dir: PathBuf::new(),
            in_memory: false,
        };
        assert_eq!(config.validate(), Err(ValidationError::MissingDataDir));

        config.in_memory = true;
        assert!(config.validate().is_ok());
    }
}
