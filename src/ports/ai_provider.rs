//! AI Provider Port - Interface for LLM provider integrations.
//!
//! This port abstracts every interaction with the text generation model,
//! so the drafting handlers can ask for completions without knowing which
//! vendor answers them.
//!
//! # Design
//!
//! - Single-shot completions: a prompt, an optional system instruction and
//!   sampling settings go in, raw text comes out
//! - Callers may supply their own API key per request (it takes precedence
//!   over the configured keys)
//! - Error types for the failure modes callers react to (rate limits,
//!   timeouts, upstream rejections)
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct EchoProvider;
//!
//! #[async_trait]
//! impl AIProvider for EchoProvider {
//!     async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
//!         Ok(CompletionResponse::new(request.prompt, "echo"))
//!     }
//!
//!     fn provider_info(&self) -> ProviderInfo {
//!         ProviderInfo::new("echo", "echo", 0)
//!     }
//! }
//! ```

use async_trait::async_trait;
use secrecy::Secret;

use crate::domain::prompts::Prompt;

/// Default maximum number of tokens to generate.
pub const DEFAULT_MAX_TOKENS: u32 = 8192;

/// Port for AI/LLM provider interactions.
///
/// Implementations connect to an external model service and translate
/// between its wire format and these types.
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Generate a single completion.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError>;

    /// Get provider information (name, model, context size).
    fn provider_info(&self) -> ProviderInfo;
}

/// Request for AI completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// User-facing prompt text.
    pub prompt: String,
    /// System instruction guiding model behavior.
    pub system_prompt: Option<String>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Temperature for response randomness (0.0 = deterministic, 1.0+ = creative).
    pub temperature: Option<f32>,
    /// Key supplied by the caller; used before any configured key.
    pub api_key_override: Option<Secret<String>>,
}

impl CompletionRequest {
    /// Creates a new completion request for a prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_prompt: None,
            max_tokens: None,
            temperature: None,
            api_key_override: None,
        }
    }

    /// Sets the system prompt. Blank instructions are ignored.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        let prompt = prompt.into();
        self.system_prompt = if prompt.trim().is_empty() {
            None
        } else {
            Some(prompt)
        };
        self
    }

    /// Sets the maximum tokens to generate.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Sets the temperature.
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Sets a caller-supplied API key. Blank keys are ignored.
    pub fn with_api_key_override(mut self, key: Option<String>) -> Self {
        self.api_key_override = key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .map(Secret::new);
        self
    }

    /// Prompt text with the system instruction prepended, separated by a blank line.
    pub fn full_prompt(&self) -> String {
        match &self.system_prompt {
            Some(system) => format!("{}\n\n{}", system, self.prompt),
            None => self.prompt.clone(),
        }
    }
}

impl From<Prompt> for CompletionRequest {
    fn from(prompt: Prompt) -> Self {
        CompletionRequest::new(prompt.text)
            .with_system_prompt(prompt.system)
            .with_temperature(prompt.temperature)
    }
}

/// Response from AI completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    /// Generated text.
    pub content: String,
    /// Model that generated the response.
    pub model: String,
}

impl CompletionResponse {
    pub fn new(content: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: model.into(),
        }
    }
}

/// Information about an AI provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderInfo {
    /// Provider name (e.g., "gemini").
    pub name: String,
    /// Model identifier (e.g., "gemini-2.0-flash").
    pub model: String,
    /// Maximum context window size in tokens.
    pub max_context_tokens: u32,
}

impl ProviderInfo {
    /// Creates provider info.
    pub fn new(name: impl Into<String>, model: impl Into<String>, max_context: u32) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            max_context_tokens: max_context,
        }
    }
}

/// AI provider errors.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum AIError {
    /// Quota exhausted on every attempt.
    #[error("rate limited after {attempts} attempts")]
    RateLimited {
        /// Number of calls made before giving up.
        attempts: u32,
    },

    /// The model service answered with a non-success status.
    #[error("upstream error ({status}): {message}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Message reported by the service.
        message: String,
    },

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    TimedOut {
        /// Configured timeout.
        timeout_secs: u64,
    },

    /// Network error.
    #[error("network error: {0}")]
    Network(String),

    /// Response could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// Request was malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No key configured and none supplied by the caller.
    #[error("no API key configured")]
    MissingApiKey,
}

impl AIError {
    /// Creates an upstream error.
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if a caller may sensibly try again later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AIError::RateLimited { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn completion_request_builder_works() {
        let request = CompletionRequest::new("Hello")
            .with_system_prompt("Be helpful")
            .with_max_tokens(100)
            .with_temperature(0.3);

        assert_eq!(request.prompt, "Hello");
        assert_eq!(request.system_prompt, Some("Be helpful".to_string()));
        assert_eq!(request.max_tokens, Some(100));
        assert_eq!(request.temperature, Some(0.3));
        assert!(request.api_key_override.is_none());
    }

    #[test]
    fn full_prompt_prepends_system_instruction() {
        let request = CompletionRequest::new("Task").with_system_prompt("Rules");
        assert_eq!(request.full_prompt(), "Rules\n\nTask");

        let bare = CompletionRequest::new("Task").with_system_prompt("   ");
        assert_eq!(bare.full_prompt(), "Task");
    }

    #[test]
    fn blank_override_key_is_ignored() {
        let request = CompletionRequest::new("x").with_api_key_override(Some("  ".into()));
        assert!(request.api_key_override.is_none());

        let request = CompletionRequest::new("x").with_api_key_override(Some(" k1 ".into()));
        assert_eq!(request.api_key_override.unwrap().expose_secret(), "k1");
    }

    #[test]
    fn prompt_converts_into_request() {
        let prompt = Prompt::new("Write", "You are an expert").with_temperature(0.2);
        let request = CompletionRequest::from(prompt);
        assert_eq!(request.prompt, "Write");
        assert_eq!(request.system_prompt.as_deref(), Some("You are an expert"));
        assert_eq!(request.temperature, Some(0.2));
    }

    #[test]
    fn only_rate_limits_are_retryable() {
        assert!(AIError::RateLimited { attempts: 2 }.is_retryable());
        assert!(!AIError::upstream(500, "boom").is_retryable());
        assert!(!AIError::TimedOut { timeout_secs: 30 }.is_retryable());
        assert!(!AIError::MissingApiKey.is_retryable());
    }

    #[test]
    fn ai_error_displays_correctly() {
        assert_eq!(
            AIError::RateLimited { attempts: 2 }.to_string(),
            "rate limited after 2 attempts"
        );
        assert_eq!(
            AIError::upstream(403, "forbidden").to_string(),
            "upstream error (403): forbidden"
        );
    }
}
