//! Web Fetcher Port - Retrieves readable text from a partner's website.

use async_trait::async_trait;

/// Most characters of markup read from a page before text extraction.
pub const MAX_PAGE_CHARS: usize = 500_000;

/// Readable text of a fetched page.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    /// Final URL after redirects.
    pub url: String,
    /// Visible text with markup stripped.
    pub text: String,
    /// True when the markup was cut at [`MAX_PAGE_CHARS`].
    pub truncated: bool,
}

/// Errors raised while fetching a page.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("request timed out after {timeout_secs}s")]
    TimedOut { timeout_secs: u64 },

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("network error: {0}")]
    Network(String),
}

/// Port for fetching web pages.
#[async_trait]
pub trait WebFetcher: Send + Sync {
    /// Downloads `url` and returns its visible text.
    async fn fetch_text(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// Prefixes `https://` when the user typed a bare host.
pub fn normalize_url(url: &str) -> Result<String, FetchError> {
    let trimmed = url.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return Err(FetchError::InvalidUrl(url.to_string()));
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Ok(trimmed.to_string())
    } else if trimmed.contains("://") {
        Err(FetchError::InvalidUrl(url.to_string()))
    } else {
        Ok(format!("https://{}", trimmed))
    }
}
