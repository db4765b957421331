//! Per-request model key supplied in the `x-gemini-api-key` header.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::convert::Infallible;

pub const API_KEY_HEADER: &str = "x-gemini-api-key";

/// Header key override; `None` when the header is absent, blank or not text.
#[derive(Debug, Clone, Default)]
pub struct ApiKeyOverride(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for ApiKeyOverride
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let key = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string);
        Ok(ApiKeyOverride(key))
    }
}
