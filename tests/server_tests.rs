// HTTP API tests
// Author: kelexine (https://github.com/kelexine)

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use common::{memory_at, MockBackend};
use en2ja::backend::TranslationBackend;
use en2ja::config::AppConfig;
use en2ja::models::Language;
use en2ja::server::create_router;
use en2ja::translator::Translator;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app_with<B: TranslationBackend + 'static>(backend: B) -> (Router, Arc<Translator<B>>) {
    let (memory, _) = memory_at(0);
    let translator = Arc::new(Translator::new(backend, memory));
    let app = create_router(AppConfig::default(), Arc::clone(&translator)).unwrap();
    (app, translator)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

#[tokio::test]
async fn test_translate_uses_default_languages() {
    let (app, _) = app_with(Arc::new(MockBackend::new()));

    let (status, body) = send(&app, "POST", "/v1/translate", Some(json!({ "text": "Hello" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["translatedText"], "ja:Hello");
    assert_eq!(body["fromCache"], false);

    let (_, body) = send(&app, "POST", "/v1/translate", Some(json!({ "text": "hello" }))).await;
    assert_eq!(body["fromCache"], true);
}

#[tokio::test]
async fn test_translate_accepts_language_aliases() {
    let backend = Arc::new(MockBackend::new());
    let (app, _) = app_with(Arc::clone(&backend));

    let (status, body) = send(
        &app,
        "POST",
        "/v1/translate",
        Some(json!({ "text": "研究", "source": "ja-JP", "target": "English" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["translatedText"], "en:研究");
    assert_eq!(backend.calls()[0].source, Some(Language::Japanese));
}

#[tokio::test]
async fn test_invalid_requests_are_400() {
    let (app, _) = app_with(Arc::new(MockBackend::new()));

    let (status, body) = send(&app, "POST", "/v1/translate", Some(json!({ "text": "  " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "error");
    assert_eq!(body["error"]["type"], "invalid_request_error");

    let (status, _) = send(
        &app,
        "POST",
        "/v1/translate",
        Some(json!({ "text": "Hello", "target": "fr" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/v1/translate", Some(json!({ "texts": [] }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_backend_failure_is_502() {
    let backend = Arc::new(MockBackend::new());
    backend.fail_on("Hello");
    let (app, _) = app_with(backend);

    let (status, body) = send(&app, "POST", "/v1/translate", Some(json!({ "text": "Hello" }))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["type"], "backend_error");
}

#[tokio::test]
async fn test_missing_backend_serves_cache_and_503s_misses() {
    let (app, translator) = app_with(None::<MockBackend>);
    translator
        .memory()
        .record("Hello", Language::English, Language::Japanese, "こんにちは", 1.0);

    let (status, body) = send(&app, "POST", "/v1/translate", Some(json!({ "text": "Hello" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["translatedText"], "こんにちは");

    let (status, body) = send(&app, "POST", "/v1/translate", Some(json!({ "text": "Goodbye" }))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["type"], "not_configured_error");

    let (_, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(body["status"], "degraded");
}

#[tokio::test]
async fn test_batch_endpoint_preserves_order() {
    let (app, _) = app_with(Arc::new(MockBackend::new()));

    let (status, body) = send(
        &app,
        "POST",
        "/v1/translate/batch",
        Some(json!({ "texts": ["One", "Two", "Three"], "source": "en", "target": "ja" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let translated: Vec<&str> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["translatedText"].as_str().unwrap())
        .collect();
    assert_eq!(translated, vec!["ja:One", "ja:Two", "ja:Three"]);
}

#[tokio::test]
async fn test_auto_endpoint_reports_detected_language() {
    let backend = Arc::new(MockBackend::new());
    backend.detect_as("en");
    let (app, _) = app_with(backend);

    let (status, body) = send(
        &app,
        "POST",
        "/v1/translate/auto",
        Some(json!({ "text": "Good morning", "target": "ja" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detectedLanguage"], "en");
}

#[tokio::test]
async fn test_memory_endpoints() {
    let (app, translator) = app_with(Arc::new(MockBackend::new()));
    send(&app, "POST", "/v1/translate", Some(json!({ "text": "Hello" }))).await;

    let (status, body) = send(&app, "GET", "/v1/memory/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalEntries"], 1);
    assert!(body["totalSizeBytes"].as_u64().unwrap() > 0);

    let (status, body) = send(&app, "POST", "/v1/memory/evict", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], 0);

    let (status, _) = send(&app, "DELETE", "/v1/memory", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(translator.memory().stats().total_entries, 0);
}

#[tokio::test]
async fn test_health_and_metrics() {
    let (app, _) = app_with(Arc::new(MockBackend::new()));

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["translation_memory"]["status"], "ok");

    send(&app, "POST", "/v1/translate", Some(json!({ "text": "Hello" }))).await;
    let (status, body) = send(&app, "GET", "/metrics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_str().unwrap().contains("translation_requests_total"));
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let (app, _) = app_with(Arc::new(MockBackend::new()));
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}
