//! Response normalization.
//!
//! Models are told to answer with bare JSON or JSON inside a fenced block,
//! but routinely wrap it in prose. This module recovers the JSON value or
//! reports a `ParseError` carrying the raw text. It never repairs malformed
//! JSON.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// A fenced code block anywhere in the text, optionally tagged `json`.
static FENCED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```(?:json|JSON)?[ \t]*\r?\n?(.*?)```").expect("fenced block regex")
});

/// Widest object span: first `{` to last `}`.
static OBJECT_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("object span regex"));

/// Widest array span: first `[` to last `]`.
static ARRAY_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\[.*\]").expect("array span regex"));

/// Model output that did not yield valid JSON.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Could not parse model output as JSON: {reason}")]
pub struct ParseError {
    /// Parser diagnostic.
    pub reason: String,
    /// Untouched model output, kept for inspection.
    pub raw: String,
}

impl ParseError {
    fn new(reason: impl Into<String>, raw: &str) -> Self {
        Self {
            reason: reason.into(),
            raw: raw.to_string(),
        }
    }
}

/// Extracts and parses the JSON value contained in a model response.
///
/// Order of attempts:
/// 1. the whole trimmed text
/// 2. a response that is one fenced block: everything between the opening
///    fence line and the last closing fence, so fences inside string
///    values survive
/// 3. the body of the first fenced block embedded in prose
/// 4. the widest `{...}` span
/// 5. the widest `[...]` span
///
/// The first candidate that parses wins. When none does, the error carries
/// the diagnostic of the first candidate tried.
pub fn normalize(raw: &str) -> Result<Value, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseError::new("empty response", raw));
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Ok(value);
    }

    let mut first_error: Option<String> = None;
    for candidate in candidates(trimmed) {
        match serde_json::from_str::<Value>(candidate) {
            Ok(value) => return Ok(value),
            Err(e) => {
                first_error.get_or_insert_with(|| e.to_string());
            }
        }
    }

    Err(ParseError::new(
        first_error.unwrap_or_else(|| "no JSON object or array found".to_string()),
        raw,
    ))
}

/// Normalizes and then deserializes into a typed shape.
///
/// A shape mismatch (missing required key, object where an array was
/// expected) is reported the same way as malformed JSON.
pub fn normalize_as<T: DeserializeOwned>(raw: &str) -> Result<T, ParseError> {
    let value = normalize(raw)?;
    serde_json::from_value(value).map_err(|e| ParseError::new(e.to_string(), raw))
}

/// Removes a leading ```` ```{lang} ```` fence and a trailing ```` ``` ````.
///
/// Text without a leading fence is returned trimmed but otherwise untouched.
pub fn strip_markdown_fence(text: &str, lang: &str) -> String {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed.to_string();
    };
    let rest = rest.strip_prefix(lang).unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim().to_string()
}

fn candidates(text: &str) -> Vec<&str> {
    let mut found = Vec::new();
    if let Some(body) = outer_fence_body(text) {
        found.push(body);
    }
    if let Some(body) = FENCED_BLOCK
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|body| !body.is_empty())
    {
        found.push(body);
    }
    if let Some(span) = OBJECT_SPAN.find(text) {
        found.push(span.as_str());
    }
    if let Some(span) = ARRAY_SPAN.find(text) {
        found.push(span.as_str());
    }
    found.dedup();
    found
}

/// Body of a response that opens with a fence line and ends with a fence.
fn outer_fence_body(text: &str) -> Option<&str> {
    let rest = text.strip_prefix("```")?;
    let (tag, body) = rest.split_once('\n')?;
    if !tag.trim().chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    let body = body.trim_end().strip_suffix("```")?.trim();
    (!body.is_empty()).then_some(body)
}
