// Google Translate client wire format tests
// Author: kelexine (https://github.com/kelexine)

use en2ja::backend::{GoogleTranslateClient, TranslationBackend};
use en2ja::config::{ApiKey, TranslationConfig};
use en2ja::error::TranslateError;
use en2ja::models::Language;
use mockito::Matcher;
use serde_json::json;

const API_PATH: &str = "/language/translate/v2";

fn client_for(server: &mockito::Server, max_retries: u32) -> GoogleTranslateClient {
    let config = TranslationConfig {
        api_key: Some(ApiKey::new("test-key")),
        api_base_url: format!("{}{}", server.url(), API_PATH),
        max_retries,
        retry_delay_ms: 1,
        ..TranslationConfig::default()
    };
    GoogleTranslateClient::new(&config).unwrap()
}

fn texts(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_request_shape_and_key_parameter() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", API_PATH)
        .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
        .match_body(Matcher::Json(json!({
            "q": ["Hello", "Research"],
            "source": "en",
            "target": "ja",
            "format": "text"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "data": {
                    "translations": [
                        { "translatedText": "こんにちは" },
                        { "translatedText": "研究" }
                    ]
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server, 0);
    let results = client
        .translate(&texts(&["Hello", "Research"]), Some(Language::English), Language::Japanese)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].translated_text, "こんにちは");
    assert_eq!(results[1].translated_text, "研究");
    assert!(results[0].detected_language.is_none());
}

#[tokio::test]
async fn test_auto_detection_omits_source() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", API_PATH)
        .match_query(Matcher::Any)
        .match_body(Matcher::Json(json!({
            "q": ["Bonjour"],
            "target": "ja",
            "format": "text"
        })))
        .with_status(200)
        .with_body(
            json!({
                "data": {
                    "translations": [
                        { "translatedText": "こんにちは", "detectedSourceLanguage": "fr" }
                    ]
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server, 0);
    let results = client.translate(&texts(&["Bonjour"]), None, Language::Japanese).await.unwrap();

    mock.assert_async().await;
    assert_eq!(results[0].detected_language.as_deref(), Some("fr"));
}

#[tokio::test]
async fn test_forbidden_maps_to_backend_error_without_retry() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", API_PATH)
        .match_query(Matcher::Any)
        .with_status(403)
        .with_body(
            json!({
                "error": {
                    "code": 403,
                    "message": "The request is missing a valid API key.",
                    "status": "PERMISSION_DENIED"
                }
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server, 3);
    let err = client
        .translate(&texts(&["Hello"]), Some(Language::English), Language::Japanese)
        .await
        .unwrap_err();

    mock.assert_async().await;
    let message = err.to_string();
    assert!(matches!(err, TranslateError::Backend(_)));
    assert!(message.contains("API key"));
    assert!(message.contains("missing a valid API key"));
    assert!(!message.contains("test-key"));
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", API_PATH)
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("backend unavailable")
        .expect(3)
        .create_async()
        .await;

    let client = client_for(&server, 2);
    let err = client
        .translate(&texts(&["Hello"]), Some(Language::English), Language::Japanese)
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(matches!(err, TranslateError::Backend(_)));
}

#[tokio::test]
async fn test_result_count_mismatch_is_backend_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", API_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!({ "data": { "translations": [{ "translatedText": "一" }] } }).to_string())
        .create_async()
        .await;

    let client = client_for(&server, 0);
    let err = client
        .translate(&texts(&["one", "two"]), Some(Language::English), Language::Japanese)
        .await
        .unwrap_err();

    assert!(matches!(err, TranslateError::Backend(_)));
    assert!(err.to_string().contains("Expected 2 translations"));
}

#[tokio::test]
async fn test_empty_input_makes_no_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", API_PATH)
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server, 0);
    let results = client.translate(&[], Some(Language::English), Language::Japanese).await.unwrap();

    mock.assert_async().await;
    assert!(results.is_empty());
}
