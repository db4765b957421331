//! Error and model-call helpers shared by the proposal assistance handlers.

use crate::application::handlers::concept::{
    MISSING_KEY_MESSAGE, RATE_LIMITED_MESSAGE, TIMED_OUT_MESSAGE,
};
use crate::domain::foundation::ValidationError;
use crate::domain::normalizer::{normalize_as, ParseError};
use crate::domain::prompts::Prompt;
use crate::ports::{AIError, AIProvider, CompletionRequest};
use serde::de::DeserializeOwned;

/// Error type for proposal assistance commands
#[derive(Debug, Clone, PartialEq)]
pub enum ProposalAssistError {
    /// Request rejected before any model call
    InvalidInput(ValidationError),
    /// The model call failed
    Model(AIError),
    /// The model answered with something that is not the expected JSON
    Parse(ParseError),
}

impl std::fmt::Display for ProposalAssistError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProposalAssistError::InvalidInput(err) => write!(f, "{}", err),
            ProposalAssistError::Model(err) => write!(f, "AI Provider error: {}", err),
            ProposalAssistError::Parse(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ProposalAssistError {}

impl ProposalAssistError {
    /// Message shown next to the part of the form that could not be written.
    pub fn user_message(&self, label: &str) -> String {
        match self {
            ProposalAssistError::Model(AIError::RateLimited { .. }) => RATE_LIMITED_MESSAGE.to_string(),
            ProposalAssistError::Model(AIError::TimedOut { .. }) => TIMED_OUT_MESSAGE.to_string(),
            ProposalAssistError::Model(AIError::MissingApiKey) => MISSING_KEY_MESSAGE.to_string(),
            ProposalAssistError::Model(err) => format!("{} failed: {}", label, err),
            ProposalAssistError::Parse(_) => format!(
                "{} failed: the response could not be read. Please try again.",
                label
            ),
            ProposalAssistError::InvalidInput(err) => format!("{} failed: {}", label, err),
        }
    }
}

impl From<ValidationError> for ProposalAssistError {
    fn from(err: ValidationError) -> Self {
        ProposalAssistError::InvalidInput(err)
    }
}

impl From<AIError> for ProposalAssistError {
    fn from(err: AIError) -> Self {
        ProposalAssistError::Model(err)
    }
}

impl From<ParseError> for ProposalAssistError {
    fn from(err: ParseError) -> Self {
        ProposalAssistError::Parse(err)
    }
}

/// Rejects blank required text.
pub(crate) fn require_text(field: &str, value: &str) -> Result<(), ProposalAssistError> {
    if value.trim().is_empty() {
        return Err(ValidationError::empty_field(field).into());
    }
    Ok(())
}

/// Sends a prompt and returns the raw answer text.
pub(crate) async fn complete_text<P: ?Sized + AIProvider>(
    provider: &P,
    prompt: Prompt,
    api_key: Option<String>,
) -> Result<String, ProposalAssistError> {
    let request = CompletionRequest::from(prompt).with_api_key_override(api_key);
    let response = provider.complete(request).await?;
    Ok(response.content)
}

/// Like [`complete_text`], but an empty answer is an error.
pub(crate) async fn complete_nonempty_text<P: ?Sized + AIProvider>(
    provider: &P,
    prompt: Prompt,
    api_key: Option<String>,
) -> Result<String, ProposalAssistError> {
    let text = complete_text(provider, prompt, api_key).await?;
    if text.trim().is_empty() {
        return Err(AIError::Parse("model returned an empty answer".to_string()).into());
    }
    Ok(text)
}

/// Sends a prompt and decodes the JSON answer.
pub(crate) async fn complete_json<P: ?Sized + AIProvider, T: DeserializeOwned>(
    provider: &P,
    prompt: Prompt,
    api_key: Option<String>,
) -> Result<T, ProposalAssistError> {
    let raw = complete_text(provider, prompt, api_key).await?;
    normalize_as::<T>(&raw).map_err(|err| {
        tracing::warn!(reason = %err.reason, "Model answer was not the expected JSON");
        ProposalAssistError::Parse(err)
    })
}
