//! Integration tests for the Gemini provider against a local fake API.
//!
//! A small axum server stands in for the generateContent endpoint. It
//! replays a scripted list of responses and records the key used for each
//! call, so retry bound, key rotation and timeout handling can be checked
//! over real HTTP.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use erasmus_architect::adapters::ai::{GeminiConfig, GeminiProvider};
use erasmus_architect::ports::{AIError, AIProvider, CompletionRequest};

// =============================================================================
// Fake Gemini server
// =============================================================================

#[derive(Clone)]
enum Scripted {
    Text(&'static str),
    RateLimited,
    ResourceExhaustedBody,
    ServerError,
    Slow(Duration),
}

#[derive(Clone, Default)]
struct FakeGemini {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    keys_seen: Arc<Mutex<Vec<String>>>,
    bodies: Arc<Mutex<Vec<Value>>>,
}

impl FakeGemini {
    fn new(script: Vec<Scripted>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            ..Default::default()
        }
    }

    fn keys_seen(&self) -> Vec<String> {
        self.keys_seen.lock().unwrap().clone()
    }

    fn call_count(&self) -> usize {
        self.keys_seen.lock().unwrap().len()
    }
}

fn candidate(text: &str) -> Value {
    json!({"candidates": [{"content": {"parts": [{"text": text}]}}]})
}

async fn generate(
    State(fake): State<FakeGemini>,
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    fake.keys_seen
        .lock()
        .unwrap()
        .push(params.get("key").cloned().unwrap_or_default());
    fake.bodies.lock().unwrap().push(body);

    let next = fake
        .script
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or(Scripted::Text("default"));

    match next {
        Scripted::Text(text) => Json(candidate(text)).into_response(),
        Scripted::RateLimited => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}})),
        )
            .into_response(),
        Scripted::ResourceExhaustedBody => (
            StatusCode::OK,
            Json(json!({"error": {"message": "Resource exhausted for project"}})),
        )
            .into_response(),
        Scripted::ServerError => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": {"code": 500, "message": "internal"}})),
        )
            .into_response(),
        Scripted::Slow(delay) => {
            tokio::time::sleep(delay).await;
            Json(candidate("late")).into_response()
        }
    }
}

async fn spawn_fake(fake: FakeGemini) -> String {
    let app = Router::new()
        .route("/v1beta/models/:action", post(generate))
        .with_state(fake);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/v1beta", addr)
}

fn provider(base_url: String, primary: Option<&str>, fallback: Option<&str>) -> GeminiProvider {
    let config = GeminiConfig::new(primary.map(str::to_string))
        .with_fallback_api_key(fallback.map(str::to_string))
        .with_base_url(base_url)
        .with_backoff_base(Duration::from_millis(1))
        .with_timeout(Duration::from_millis(500));
    GeminiProvider::new(config).unwrap()
}

fn request() -> CompletionRequest {
    CompletionRequest::new("Write one objective")
        .with_system_prompt("You are an Erasmus+ expert")
        .with_temperature(0.5)
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn returns_candidate_text_and_sends_generation_config() {
    let fake = FakeGemini::new(vec![Scripted::Text("SO1: Improve digital skills")]);
    let base = spawn_fake(fake.clone()).await;

    let response = provider(base, Some("key-a"), None)
        .complete(request())
        .await
        .unwrap();

    assert_eq!(response.content, "SO1: Improve digital skills");
    let body = fake.bodies.lock().unwrap()[0].clone();
    assert_eq!(
        body["contents"][0]["parts"][0]["text"],
        json!("You are an Erasmus+ expert\n\nWrite one objective")
    );
    assert_eq!(body["generationConfig"]["temperature"], json!(0.5));
    assert_eq!(body["generationConfig"]["maxOutputTokens"], json!(8192));
}

#[tokio::test]
async fn persistent_rate_limit_stops_after_two_calls() {
    let fake = FakeGemini::new(vec![
        Scripted::RateLimited,
        Scripted::RateLimited,
        Scripted::Text("never reached"),
    ]);
    let base = spawn_fake(fake.clone()).await;

    let result = provider(base, Some("key-a"), None).complete(request()).await;

    assert_eq!(result, Err(AIError::RateLimited { attempts: 2 }));
    assert_eq!(fake.call_count(), 2);
}

#[tokio::test]
async fn rate_limit_rotates_to_fallback_key() {
    let fake = FakeGemini::new(vec![Scripted::RateLimited, Scripted::Text("ok")]);
    let base = spawn_fake(fake.clone()).await;

    let response = provider(base, Some("key-a"), Some("key-b"))
        .complete(request())
        .await
        .unwrap();

    assert_eq!(response.content, "ok");
    assert_eq!(fake.keys_seen(), vec!["key-a", "key-b"]);
}

#[tokio::test]
async fn resource_exhausted_message_counts_as_rate_limit() {
    let fake = FakeGemini::new(vec![Scripted::ResourceExhaustedBody, Scripted::Text("ok")]);
    let base = spawn_fake(fake.clone()).await;

    let response = provider(base, Some("key-a"), None)
        .complete(request())
        .await
        .unwrap();

    assert_eq!(response.content, "ok");
    assert_eq!(fake.call_count(), 2);
}

#[tokio::test]
async fn header_override_is_used_alone() {
    let fake = FakeGemini::new(vec![Scripted::RateLimited, Scripted::RateLimited]);
    let base = spawn_fake(fake.clone()).await;

    let result = provider(base, Some("key-a"), Some("key-b"))
        .complete(request().with_api_key_override(Some("header-key".to_string())))
        .await;

    assert!(matches!(result, Err(AIError::RateLimited { .. })));
    assert_eq!(fake.keys_seen(), vec!["header-key", "header-key"]);
}

#[tokio::test]
async fn server_errors_are_not_retried() {
    let fake = FakeGemini::new(vec![Scripted::ServerError, Scripted::Text("unused")]);
    let base = spawn_fake(fake.clone()).await;

    let result = provider(base, Some("key-a"), None).complete(request()).await;

    assert!(matches!(result, Err(AIError::Upstream { status: 500, .. })));
    assert_eq!(fake.call_count(), 1);
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let fake = FakeGemini::new(vec![Scripted::Slow(Duration::from_secs(3))]);
    let base = spawn_fake(fake.clone()).await;

    let result = provider(base, Some("key-a"), None).complete(request()).await;

    assert!(matches!(result, Err(AIError::TimedOut { .. })));
}

#[tokio::test]
async fn missing_key_fails_without_calling() {
    let fake = FakeGemini::new(vec![]);
    let base = spawn_fake(fake.clone()).await;

    let result = provider(base, None, None).complete(request()).await;

    assert_eq!(result, Err(AIError::MissingApiKey));
    assert_eq!(fake.call_count(), 0);
}
