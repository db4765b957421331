//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `ERASMUS_ARCHITECT` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use erasmus_architect::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on port {}", config.server.port);
//! ```

mod error;
mod gemini;
mod server;
mod storage;

pub use error::{ConfigError, ValidationError};
pub use gemini::GeminiSettings;
pub use server::{Environment, ServerConfig};
pub use storage::StorageConfig;

use secrecy::Secret;
use serde::Deserialize;

/// Plain variable names also honoured for the Gemini keys.
const LEGACY_PRIMARY_KEY_VAR: &str = "GEMINI_API_KEY";
const LEGACY_FALLBACK_KEY_VAR: &str = "GEMINI_API_KEY_2";

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a runnable
/// configuration whose generation calls need a per-request key.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Server configuration (host, port, logging, CORS)
    #[serde(default)]
    pub server: ServerConfig,

    /// Gemini model access
    #[serde(default)]
    pub gemini: GeminiSettings,

    /// Concept session storage
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `ERASMUS_ARCHITECT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Falls back to `GEMINI_API_KEY` / `GEMINI_API_KEY_2` for unset keys
    ///
    /// # Environment Variable Format
    ///
    /// - `ERASMUS_ARCHITECT__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `ERASMUS_ARCHITECT__GEMINI__API_KEY=...` -> `gemini.api_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let mut config: AppConfig = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("ERASMUS_ARCHITECT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        if config.gemini.api_key.is_none() {
            config.gemini.api_key = legacy_key(LEGACY_PRIMARY_KEY_VAR);
        }
        if config.gemini.fallback_api_key.is_none() {
            config.gemini.fallback_api_key = legacy_key(LEGACY_FALLBACK_KEY_VAR);
        }

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.gemini.validate()?;
        self.storage.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

fn legacy_key(var: &str) -> Option<Secret<String>> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(Secret::new)
}
