//! Error body shared by every endpoint, and the mapping of model failures
//! onto HTTP status codes.

use axum::http::StatusCode;
use serde::Serialize;

use crate::application::handlers::concept::{
    MISSING_KEY_MESSAGE, RATE_LIMITED_MESSAGE, TIMED_OUT_MESSAGE,
};
use crate::ports::AIError;

/// Standard error response body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}

/// Status, code and user-facing message for a failed model call.
pub(crate) fn ai_error_parts(err: &AIError) -> (StatusCode, &'static str, String) {
    match err {
        AIError::RateLimited { .. } => (
            StatusCode::TOO_MANY_REQUESTS,
            "RATE_LIMITED",
            RATE_LIMITED_MESSAGE.to_string(),
        ),
        AIError::TimedOut { .. } => (
            StatusCode::GATEWAY_TIMEOUT,
            "UPSTREAM_TIMEOUT",
            TIMED_OUT_MESSAGE.to_string(),
        ),
        AIError::MissingApiKey => (
            StatusCode::SERVICE_UNAVAILABLE,
            "API_KEY_MISSING",
            MISSING_KEY_MESSAGE.to_string(),
        ),
        AIError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg.clone()),
        AIError::Upstream { .. } | AIError::Network(_) | AIError::Parse(_) => {
            (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_maps_to_429_with_wait_message() {
        let (status, code, message) = ai_error_parts(&AIError::RateLimited { attempts: 2 });
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(code, "RATE_LIMITED");
        assert!(message.contains("1-2 minutes"));
    }

    #[test]
    fn timeouts_and_upstream_failures_are_gateway_errors() {
        let (status, _, _) = ai_error_parts(&AIError::TimedOut { timeout_secs: 60 });
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);

        let (status, _, _) = ai_error_parts(&AIError::upstream(500, "boom"));
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn details_are_omitted_when_absent() {
        let json = serde_json::to_value(ErrorResponse::new("NOT_FOUND", "missing")).unwrap();
        assert_eq!(json, serde_json::json!({"code": "NOT_FOUND", "message": "missing"}));
    }
}
