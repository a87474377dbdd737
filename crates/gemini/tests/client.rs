//! End-to-end tests for `GeminiClient` against a local fake Gemini server.

use std::net::SocketAddr;
use std::time::Duration;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use shopseo_core::generation::{DescriptionGenerator, GenerationErrorKind, GenerationRequest};
use shopseo_gemini::{GeminiClient, GeminiConfig};

/// Serve `router` on an ephemeral port and return its base URL.
async fn spawn_fake(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn client_for(base_url: String, timeout: Duration) -> GeminiClient {
    GeminiClient::new(GeminiConfig {
        api_key: "test-key".to_string(),
        model: "gemini-test".to_string(),
        base_url,
        timeout,
    })
    .unwrap()
}

fn request() -> GenerationRequest {
    GenerationRequest {
        prompt: "Write a description".to_string(),
        max_output_tokens: 256,
        temperature: 0.7,
    }
}

fn fixed(status: StatusCode, body: Value) -> Router {
    Router::new().route(
        "/v1beta/models/gemini-test:generateContent",
        post(move || {
            let body = body.clone();
            async move { (status, Json(body)) }
        }),
    )
}

#[tokio::test]
async fn successful_call_returns_text_and_sends_key() {
    let router = Router::new().route(
        "/v1beta/models/gemini-test:generateContent",
        post(|headers: HeaderMap, Json(body): Json<Value>| async move {
            assert_eq!(headers["x-goog-api-key"], "test-key");
            assert_eq!(body["generationConfig"]["maxOutputTokens"], 256);
            Json(json!({
                "candidates": [{
                    "content": {"parts": [{"text": "<p>A fine mug.</p>"}]},
                    "finishReason": "STOP"
                }]
            }))
        }),
    );
    let client = client_for(spawn_fake(router).await, Duration::from_secs(5));

    let text = client.generate(&request()).await.unwrap();
    assert_eq!(text, "<p>A fine mug.</p>");
}

#[tokio::test]
async fn rate_limit_is_retryable() {
    let router = fixed(
        StatusCode::TOO_MANY_REQUESTS,
        json!({"error": {"code": 429, "message": "Resource exhausted", "status": "RESOURCE_EXHAUSTED"}}),
    );
    let client = client_for(spawn_fake(router).await, Duration::from_secs(5));

    let err = client.generate(&request()).await.unwrap_err();
    assert_eq!(err.kind, GenerationErrorKind::RateLimited);
    assert!(err.retryable());
    assert!(err.message.contains("Resource exhausted"));
}

#[tokio::test]
async fn invalid_key_is_not_retryable() {
    let router = fixed(
        StatusCode::BAD_REQUEST,
        json!({"error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}}),
    );
    let client = client_for(spawn_fake(router).await, Duration::from_secs(5));

    let err = client.generate(&request()).await.unwrap_err();
    assert_eq!(err.kind, GenerationErrorKind::Rejected);
    assert!(!err.retryable());
}

#[tokio::test]
async fn blocked_prompt_is_content_policy() {
    let router = fixed(StatusCode::OK, json!({"promptFeedback": {"blockReason": "SAFETY"}}));
    let client = client_for(spawn_fake(router).await, Duration::from_secs(5));

    let err = client.generate(&request()).await.unwrap_err();
    assert_eq!(err.kind, GenerationErrorKind::ContentPolicy);
    assert!(!err.retryable());
}

#[tokio::test]
async fn empty_candidates_are_malformed_output() {
    let router = fixed(StatusCode::OK, json!({"candidates": []}));
    let client = client_for(spawn_fake(router).await, Duration::from_secs(5));

    let err = client.generate(&request()).await.unwrap_err();
    assert_eq!(err.kind, GenerationErrorKind::MalformedOutput);
}

#[tokio::test]
async fn slow_provider_times_out() {
    let router = Router::new().route(
        "/v1beta/models/gemini-test:generateContent",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!({}))
        }),
    );
    let client = client_for(spawn_fake(router).await, Duration::from_millis(200));

    let err = client.generate(&request()).await.unwrap_err();
    assert_eq!(err.kind, GenerationErrorKind::Timeout);
    assert!(err.retryable());
}

#[tokio::test]
async fn unreachable_provider_is_unavailable() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(format!("http://{addr}"), Duration::from_secs(2));
    let err = client.generate(&request()).await.unwrap_err();
    assert_eq!(err.kind, GenerationErrorKind::Unavailable);
    assert!(err.retryable());
}

#[tokio::test]
async fn missing_key_fails_without_network() {
    let client = GeminiClient::new(GeminiConfig::default()).unwrap();
    let err = client.generate(&request()).await.unwrap_err();
    assert_eq!(err.kind, GenerationErrorKind::Rejected);
}
