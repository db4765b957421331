//! Gemini model configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::ai::{GeminiConfig, DEFAULT_BASE_URL, DEFAULT_MODEL, MAX_RETRIES};

/// Gemini configuration
///
/// Keys are optional at startup: a request may bring its own key in the
/// `x-gemini-api-key` header.
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    /// Primary API key
    pub api_key: Option<Secret<String>>,

    /// Key rotated to when the primary one is rate limited
    pub fallback_api_key: Option<Secret<String>>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-call timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Backoff unit in milliseconds
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,

    /// Calls allowed while rate limited
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl GeminiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Number of non-blank configured keys.
    pub fn key_count(&self) -> usize {
        [&self.api_key, &self.fallback_api_key]
            .into_iter()
            .flatten()
            .filter(|k| !k.expose_secret().trim().is_empty())
            .count()
    }

    /// Builds the adapter configuration.
    pub fn to_provider_config(&self) -> GeminiConfig {
        let expose = |key: &Option<Secret<String>>| key.as_ref().map(|k| k.expose_secret().clone());
        GeminiConfig::new(expose(&self.api_key))
            .with_fallback_api_key(expose(&self.fallback_api_key))
            .with_model(self.model.clone())
            .with_base_url(self.base_url.clone())
            .with_timeout(self.timeout())
            .with_backoff_base(Duration::from_millis(self.backoff_ms))
            .with_max_retries(self.max_retries)
    }

    /// Validate Gemini configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.model.trim().is_empty() {
            return Err(ValidationError::MissingGeminiModel);
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ValidationError::InvalidGeminiBaseUrl);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 600 {
            return Err(ValidationError::InvalidGeminiTimeout);
        }
        if self.max_retries == 0 {
            return Err(ValidationError::InvalidGeminiRetries);
        }
        Ok(())
    }
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            fallback_api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            backoff_ms: default_backoff_ms(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_backoff_ms() -> u64 {
    1000
}

fn default_max_retries() -> u32 {
    MAX_RETRIES
}
