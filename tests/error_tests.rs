// Error handling tests
// Author: kelexine (https://github.com/kelexine)

use axum::http::StatusCode;
use axum::response::IntoResponse;
use en2ja::error::TranslateError;

#[test]
fn test_error_display_messages() {
    let errors = vec![
        TranslateError::InvalidInput("Blank text".to_string()),
        TranslateError::Backend("API error".to_string()),
        TranslateError::NotConfigured("No key".to_string()),
        TranslateError::CacheCorruption("Bad blob".to_string()),
        TranslateError::Config("Bad config".to_string()),
        TranslateError::Internal("Oops".to_string()),
    ];

    for error in errors {
        let display = format!("{}", error);
        assert!(!display.is_empty(), "Error should have display message");
    }
}

#[test]
fn test_invalid_input_error() {
    let error = TranslateError::InvalidInput("text must not be blank".to_string());
    assert!(format!("{}", error).contains("text must not be blank"));
    assert_eq!(error.kind(), "invalid_request_error");
}

#[test]
fn test_status_mapping_mentions_api_key() {
    let error = TranslateError::from_status(403, "The request is missing a valid API key.");
    let display = format!("{}", error);
    assert!(matches!(error, TranslateError::Backend(_)));
    assert!(display.contains("403"));
    assert!(display.contains("API key"));
}

#[test]
fn test_status_mapping_mentions_quota() {
    let error = TranslateError::from_status(429, "User Rate Limit Exceeded");
    assert!(format!("{}", error).contains("quota"));
}

#[test]
fn test_http_status_codes() {
    let cases = vec![
        (TranslateError::InvalidInput("x".to_string()), StatusCode::BAD_REQUEST),
        (TranslateError::Backend("x".to_string()), StatusCode::BAD_GATEWAY),
        (TranslateError::NotConfigured("x".to_string()), StatusCode::SERVICE_UNAVAILABLE),
        (TranslateError::Internal("x".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
    ];

    for (error, expected) in cases {
        assert_eq!(error.into_response().status(), expected);
    }
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
    let error: TranslateError = io.into();
    assert!(matches!(error, TranslateError::Io(_)));
    assert_eq!(error.kind(), "api_error");
}
