//! HTTP adapters - REST API implementations.
//!
//! Each area has its own HTTP adapter for endpoint exposure. `api_router`
//! assembles them with the health check and the shared middleware.

pub mod api_key;
pub mod concept;
pub mod error;
pub mod proposal;

use std::time::Duration;

use axum::routing::get;
use axum::{Json, Router};
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderName, HeaderValue};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use api_key::{ApiKeyOverride, API_KEY_HEADER};
pub use concept::{concept_routes, ConceptAppState};
pub use error::ErrorResponse;
pub use proposal::{proposal_routes, ProposalAppState};

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Builds the CORS layer; an empty origin list allows any origin.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let headers = [
        CONTENT_TYPE,
        ACCEPT,
        HeaderName::from_static(API_KEY_HEADER),
    ];
    let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    if allowed.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(headers)
    } else {
        CorsLayer::new()
            .allow_origin(allowed)
            .allow_methods(Any)
            .allow_headers(headers)
    }
}

/// The complete API with tracing, timeout and CORS layers applied.
///
/// # Routes
/// - `GET /health`
/// - `/api/concepts/...` - see [`concept_routes`]
/// - `/api/...` - see [`proposal_routes`]
pub fn api_router(
    concept: ConceptAppState,
    proposal: ProposalAppState,
    cors_origins: &[String],
    request_timeout: Duration,
) -> Router {
    let api = Router::new()
        .nest("/concepts", concept_routes().with_state(concept))
        .merge(proposal_routes().with_state(proposal));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::adapters::ai::MockAIProvider;
    use crate::adapters::storage::InMemoryStateStorage;
    use crate::adapters::web::HttpWebFetcher;

    fn router() -> Router {
        let provider = Arc::new(MockAIProvider::new());
        api_router(
            ConceptAppState::new(Arc::new(InMemoryStateStorage::new()), provider.clone()),
            ProposalAppState::new(
                provider,
                Arc::new(HttpWebFetcher::new(Duration::from_secs(1)).unwrap()),
            ),
            &[],
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn health_is_ok() {
        let response = router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_session_is_404() {
        let uri = format!("/api/concepts/{}", crate::domain::foundation::SessionId::new());
        let response = router()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn budget_distribution_is_routed() {
        let body = serde_json::json!({
            "plan": {
                "actionType": "KA210",
                "budgetTier": 30000,
                "partners": [
                    {"id": "a", "name": "A", "country": "DE", "role": "coordinator"},
                    {"id": "b", "name": "B", "country": "PL"}
                ],
                "workPackages": [{"id": "wp1", "number": 1, "title": "Project Management"}]
            },
            "mode": "even"
        });
        let response = router()
            .oneshot(
                Request::post("/api/budget/distribute")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn cors_layer_accepts_origin_list() {
        let _ = cors_layer(&["http://localhost:5173".to_string()]);
        let _ = cors_layer(&[]);
    }
}
