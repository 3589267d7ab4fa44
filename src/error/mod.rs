// Error types for en2ja
// Author: kelexine (https://github.com/kelexine)

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Translation backend error: {0}")]
    Backend(String),

    #[error("Translation service not configured: {0}")]
    NotConfigured(String),

    /// Unreadable persisted memory. Logged and recovered from inside the
    /// memory layer, never returned by translate calls.
    #[error("Translation memory corrupt: {0}")]
    CacheCorruption(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TranslateError {
    /// Build a backend error from an upstream HTTP status and response body.
    pub fn from_status(status: u16, body: &str) -> Self {
        let hint = match status {
            401 | 403 => " (check the Google Translate API key)",
            429 => " (quota exhausted or rate limited)",
            _ => "",
        };
        TranslateError::Backend(format!("HTTP {}{}: {}", status, hint, body))
    }

    /// Short machine-readable name used in HTTP error bodies and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            TranslateError::InvalidInput(_) => "invalid_request_error",
            TranslateError::Backend(_) => "backend_error",
            TranslateError::NotConfigured(_) => "not_configured_error",
            TranslateError::CacheCorruption(_) => "cache_error",
            TranslateError::Config(_) | TranslateError::ConfigParsing(_) => "configuration_error",
            _ => "api_error",
        }
    }
}

// Convert TranslateError to HTTP responses for Axum
impl IntoResponse for TranslateError {
    fn into_response(self) -> Response {
        let status = match self {
            TranslateError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            TranslateError::Backend(_) => StatusCode::BAD_GATEWAY,
            TranslateError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = json!({
            "type": "error",
            "error": {
                "type": self.kind(),
                "message": self.to_string(),
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, TranslateError>;
