//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Gemini base URL must start with http:// or https://")]
    InvalidGeminiBaseUrl,

    #[error("Gemini model name is empty")]
    MissingGeminiModel,

    #[error("Gemini timeout must be between 1 and 600 seconds")]
    InvalidGeminiTimeout,

    #[error("Gemini retry bound must be at least 1")]
    InvalidGeminiRetries,

    #[error("Storage data directory is empty")]
    MissingDataDir,
}
