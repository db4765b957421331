//! HTTP Web Fetcher - Implementation of WebFetcher over reqwest.
//!
//! Pages are requested with browser-like headers and a hard wall-clock
//! timeout. The body is read chunk by chunk and reading stops once enough
//! bytes for [`MAX_PAGE_CHARS`] characters have arrived; the rest of the
//! response is dropped and the page is flagged as truncated. Bodies are decoded
//! as UTF-8, replacing invalid sequences.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use std::collections::BTreeSet;
use std::time::Duration;

use crate::ports::{normalize_url, FetchError, FetchedPage, WebFetcher, MAX_PAGE_CHARS};

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; ErasmusArchitect/1.0; +https://erasmus-architect.eu)";
const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const BROWSER_ACCEPT_LANGUAGE: &str = "de,en;q=0.9";

/// A UTF-8 char is at most four bytes.
const MAX_PAGE_BYTES: usize = MAX_PAGE_CHARS * 4;

/// Fetches partner websites.
pub struct HttpWebFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpWebFetcher {
    /// Creates a fetcher with the given wall-clock timeout.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self { client, timeout })
    }

    fn map_error(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::TimedOut {
                timeout_secs: self.timeout.as_secs(),
            }
        } else if e.is_builder() {
            FetchError::InvalidUrl(e.to_string())
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

#[async_trait]
impl WebFetcher for HttpWebFetcher {
    async fn fetch_text(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let url = normalize_url(url)?;
        tracing::debug!(%url, "Fetching partner website");

        let mut response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        let final_url = response.url().to_string();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "Partner website returned an error status");
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: final_url,
            });
        }

        let mut body = Vec::new();
        let mut cut = false;
        while let Some(chunk) = response.chunk().await.map_err(|e| self.map_error(e))? {
            if push_capped(&mut body, &chunk, MAX_PAGE_BYTES) {
                cut = true;
                break;
            }
        }

        let html = String::from_utf8_lossy(&body);
        let (html, capped) = cap_chars(&html, MAX_PAGE_CHARS);
        let truncated = cut || capped;
        if truncated {
            tracing::info!(%url, "Partner website truncated before extraction");
        }

        Ok(FetchedPage {
            url: final_url,
            text: html_to_text(html),
            truncated,
        })
    }
}

/// Appends `chunk` without letting `body` grow past `max` bytes.
/// Returns true when bytes had to be dropped.
fn push_capped(body: &mut Vec<u8>, chunk: &[u8], max: usize) -> bool {
    let room = max.saturating_sub(body.len());
    if chunk.len() > room {
        body.extend_from_slice(&chunk[..room]);
        return true;
    }
    body.extend_from_slice(chunk);
    false
}

fn cap_chars(text: &str, max: usize) -> (&str, bool) {
    match text.char_indices().nth(max) {
        Some((idx, _)) => (&text[..idx], true),
        None => (text, false),
    }
}

static SCRIPT_LIKE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(script|style|noscript)\b.*?</(script|style|noscript)\s*>")
        .expect("valid script pattern")
});
static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid comment pattern"));
static BLOCK_END: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)</(div|p|h[1-6]|li|tr|section|article|header|footer|nav|aside)\s*>|<br\s*/?>")
        .expect("valid block pattern")
});
static HR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<hr\s*/?>").expect("valid hr pattern"));
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid tag pattern"));
static NUMERIC_ENTITY: Lazy<Regex> = Lazy::new(|| Regex::new(r"&#(\d+);").expect("valid entity pattern"));
static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("valid email pattern")
});
static INLINE_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").expect("valid space pattern"));
static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").expect("valid newline pattern"));

/// Visible text of an HTML document, followed by any e-mail addresses found in the markup.
pub fn html_to_text(html: &str) -> String {
    let text = SCRIPT_LIKE.replace_all(html, " ");
    let text = COMMENT.replace_all(&text, " ");
    let text = BLOCK_END.replace_all(&text, "\n");
    let text = HR.replace_all(&text, "\n---\n");
    let text = TAG.replace_all(&text, " ");

    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&");
    let text = NUMERIC_ENTITY.replace_all(&text, |caps: &regex::Captures<'_>| {
        caps[1]
            .parse::<u32>()
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_default()
    });
    let text = INLINE_SPACE.replace_all(&text, " ");
    let mut text = BLANK_LINES.replace_all(&text, "\n\n").trim().to_string();

    let emails: BTreeSet<&str> = EMAIL.find_iter(html).map(|m| m.as_str()).collect();
    if !emails.is_empty() {
        text.push_str("\n\n=== CONTACT DETAILS FOUND ===\nEmails: ");
        text.push_str(&emails.into_iter().collect::<Vec<_>>().join(", "));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scripts_styles_and_tags() {
        let html = r#"<html><head><style>p { color: red }</style>
            <script type="text/javascript">var x = "<p>";</script></head>
            <body><h1>Volkshochschule</h1><p>Adult&nbsp;education &amp; training</p>
            <!-- hidden --></body></html>"#;
        let text = html_to_text(html);
        assert!(text.contains("Volkshochschule"));
        assert!(text.contains("Adult education & training"));
        assert!(!text.contains("color"));
        assert!(!text.contains("var x"));
        assert!(!text.contains("hidden"));
        assert!(!text.contains('<'));
    }

    #[test]
    fn block_elements_become_line_breaks() {
        let text = html_to_text("<div>One</div><div>Two</div>Three<br/>Four");
        let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        assert_eq!(lines, vec!["One", "Two", "Three", "Four"]);
    }

    #[test]
    fn numeric_entities_are_decoded() {
        assert_eq!(html_to_text("<p>Caf&#233;</p>"), "Café");
    }

    #[test]
    fn emails_are_listed_once() {
        let html = r#"<a href="mailto:info@vhs.example.de">info@vhs.example.de</a>"#;
        let text = html_to_text(html);
        assert!(text.ends_with("Emails: info@vhs.example.de"));
    }

    #[test]
    fn body_stops_growing_at_the_byte_cap() {
        let mut body = Vec::new();
        assert!(!push_capped(&mut body, b"abc", 8));
        assert!(!push_capped(&mut body, b"def", 8));
        assert!(push_capped(&mut body, b"ghijkl", 8));
        assert_eq!(body, b"abcdefgh");
        assert!(push_capped(&mut body, b"more", 8));
        assert_eq!(body.len(), 8);
    }

    #[test]
    fn split_multibyte_char_at_the_cap_decodes_lossily() {
        let mut body = Vec::new();
        push_capped(&mut body, "aé".as_bytes(), 2);
        assert_eq!(String::from_utf8_lossy(&body), "a\u{FFFD}");
    }

    #[test]
    fn cap_chars_flags_truncation() {
        assert_eq!(cap_chars("abcdef", 3), ("abc", true));
        assert_eq!(cap_chars("abc", 3), ("abc", false));
    }
}
