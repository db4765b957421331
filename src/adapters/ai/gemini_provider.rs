//! Gemini Provider - Implementation of AIProvider for Google's Generative Language API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = GeminiConfig::new(Some("primary-key".into()))
//!     .with_fallback_api_key(Some("second-key".into()))
//!     .with_model("gemini-2.0-flash");
//!
//! let provider = GeminiProvider::new(config)?;
//! ```
//!
//! # Keys and rate limits
//!
//! A key supplied on the request is used alone. Otherwise the primary key is
//! tried first and the fallback key takes over on the next attempt. Only
//! quota exhaustion is retried, at most [`MAX_RETRIES`] calls in total, with
//! exponential backoff between calls.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo, DEFAULT_MAX_TOKENS,
};

/// Total number of calls made for one completion while rate limited.
pub const MAX_RETRIES: u32 = 2;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Configuration for the Gemini provider.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Primary API key.
    api_key: Option<Secret<String>>,
    /// Key tried after the primary one is rate limited.
    fallback_api_key: Option<Secret<String>>,
    /// Model to use (e.g., "gemini-2.0-flash").
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Delay unit for backoff; the wait before call `n + 1` is `2^n` units.
    pub backoff_base: Duration,
    /// Calls allowed while rate limited.
    pub max_retries: u32,
}

impl GeminiConfig {
    /// Creates a configuration with an optional primary key.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: non_blank(api_key),
            fallback_api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
            backoff_base: Duration::from_secs(1),
            max_retries: MAX_RETRIES,
        }
    }

    /// Sets the fallback key. Blank keys are ignored.
    pub fn with_fallback_api_key(mut self, key: Option<String>) -> Self {
        self.fallback_api_key = non_blank(key);
        self
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the backoff unit.
    pub fn with_backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    /// Sets the number of calls allowed while rate limited (at least one).
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Configured keys in the order they are tried.
    fn configured_keys(&self) -> Vec<Secret<String>> {
        self.api_key
            .iter()
            .chain(self.fallback_api_key.iter())
            .cloned()
            .collect()
    }
}

fn non_blank(key: Option<String>) -> Option<Secret<String>> {
    key.map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .map(Secret::new)
}

/// Gemini API provider implementation.
pub struct GeminiProvider {
    config: GeminiConfig,
    client: Client,
}

/// Result of one call, before the retry policy is applied.
enum CallFailure {
    RateLimited,
    Fatal(AIError),
}

impl GeminiProvider {
    /// Creates a new Gemini provider with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Builds the generateContent endpoint URL (the key travels as a query parameter).
    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }

    /// Keys for this request: the caller's override alone, else the configured list.
    fn resolve_keys(&self, request: &CompletionRequest) -> Result<Vec<Secret<String>>, AIError> {
        let keys = match &request.api_key_override {
            Some(key) => vec![key.clone()],
            None => self.config.configured_keys(),
        };
        if keys.is_empty() {
            return Err(AIError::MissingApiKey);
        }
        Ok(keys)
    }

    /// Converts our request to Gemini's format.
    fn to_gemini_request(request: &CompletionRequest) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: request.full_prompt(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature.unwrap_or(0.7),
                max_output_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            },
        }
    }

    /// Makes one call with one key.
    async fn call_once(&self, body: &GeminiRequest, key: &Secret<String>) -> Result<String, CallFailure> {
        let response = self
            .client
            .post(self.generate_url())
            .query(&[("key", key.expose_secret().as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| CallFailure::Fatal(self.map_send_error(e)))?;

        self.read_response(response).await
    }

    fn map_send_error(&self, e: reqwest::Error) -> AIError {
        if e.is_timeout() {
            AIError::TimedOut {
                timeout_secs: self.config.timeout.as_secs(),
            }
        } else if e.is_connect() {
            AIError::network(format!("Connection failed: {}", e.without_url()))
        } else {
            AIError::network(e.without_url().to_string())
        }
    }

    /// Classifies the response and extracts the generated text.
    async fn read_response(&self, response: Response) -> Result<String, CallFailure> {
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                CallFailure::Fatal(AIError::TimedOut {
                    timeout_secs: self.config.timeout.as_secs(),
                })
            } else {
                CallFailure::Fatal(AIError::network(e.without_url().to_string()))
            }
        })?;
        let parsed: Option<GeminiResponse> = serde_json::from_str(&body).ok();
        let api_error = parsed.as_ref().and_then(|r| r.error.as_ref());

        if is_rate_limited(status, api_error) {
            return Err(CallFailure::RateLimited);
        }

        if let Some(error) = api_error {
            let code = error
                .code
                .and_then(|c| u16::try_from(c).ok())
                .unwrap_or(status.as_u16());
            return Err(CallFailure::Fatal(AIError::upstream(
                code,
                error.message.clone().unwrap_or_default(),
            )));
        }

        if !status.is_success() {
            return Err(CallFailure::Fatal(AIError::upstream(status.as_u16(), body)));
        }

        let response = parsed
            .ok_or_else(|| CallFailure::Fatal(AIError::parse("Failed to parse response body")))?;
        response
            .first_text()
            .map(str::to_string)
            .ok_or_else(|| CallFailure::Fatal(AIError::parse("No candidate text in response")))
    }
}

/// The one place that decides whether a response means "quota exhausted".
fn is_rate_limited(status: StatusCode, error: Option<&GeminiApiError>) -> bool {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return true;
    }
    let Some(error) = error else {
        return false;
    };
    if error.code == Some(429) {
        return true;
    }
    if error.status.as_deref() == Some("RESOURCE_EXHAUSTED") {
        return true;
    }
    error
        .message
        .as_deref()
        .is_some_and(|m| {
            let lower = m.to_lowercase();
            lower.contains("resource exhausted") || lower.contains("resource_exhausted")
        })
}

#[async_trait]
impl AIProvider for GeminiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        if request.prompt.trim().is_empty() {
            return Err(AIError::InvalidRequest("prompt must not be empty".to_string()));
        }
        if request
            .system_prompt
            .as_deref()
            .is_some_and(|s| s.trim().is_empty())
        {
            return Err(AIError::InvalidRequest(
                "system prompt must not be blank".to_string(),
            ));
        }
        if let Some(t) = request.temperature {
            if !(0.0..=1.0).contains(&t) {
                return Err(AIError::InvalidRequest(format!(
                    "temperature {} outside [0, 1]",
                    t
                )));
            }
        }

        let keys = self.resolve_keys(&request)?;
        let body = Self::to_gemini_request(&request);
        let mut key_index = 0usize;
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            match self.call_once(&body, &keys[key_index]).await {
                Ok(text) => {
                    tracing::debug!(model = %self.config.model, attempts, "Gemini completion succeeded");
                    return Ok(CompletionResponse::new(text, self.config.model.clone()));
                }
                Err(CallFailure::Fatal(err)) => {
                    tracing::warn!(model = %self.config.model, error = %err, "Gemini call failed");
                    return Err(err);
                }
                Err(CallFailure::RateLimited) => {
                    if attempts >= self.config.max_retries {
                        tracing::warn!(attempts, "Gemini rate limit persisted, giving up");
                        return Err(AIError::RateLimited { attempts });
                    }
                    if keys.len() > 1 {
                        let previous = key_index;
                        key_index = (key_index + 1) % keys.len();
                        tracing::warn!(
                            "Gemini rate limited on key {}/{}, switching to key {}",
                            previous + 1,
                            keys.len(),
                            key_index + 1
                        );
                    }
                    let delay = self.config.backoff_base * 2u32.saturating_pow(attempts);
                    tracing::info!(attempt = attempts, delay_ms = delay.as_millis() as u64, "Backing off after rate limit");
                    sleep(delay).await;
                }
            }
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        let max_context = match self.config.model.as_str() {
            m if m.starts_with("gemini-1.5-pro") => 2_097_152,
            m if m.starts_with("gemini-") => 1_048_576,
            _ => 32_768,
        };
        ProviderInfo::new("gemini", &self.config.model, max_context)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Gemini API Types
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    error: Option<GeminiApiError>,
}

impl GeminiResponse {
    fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()
            .map(|p| p.text.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiApiError {
    code: Option<i64>,
    message: Option<String>,
    status: Option<String>,
}
