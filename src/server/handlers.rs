// HTTP request handlers
// Author: kelexine (https://github.com/kelexine)

use super::routes::AppState;
use crate::backend::TranslationBackend;
use crate::error::{TranslateError, Result};
use crate::memory::{MemoryStats, TranslationResult};
use crate::metrics::gather_metrics;
use crate::models::Language;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, error, info};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub checks: HashMap<String, HealthCheck>,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    pub text: String,
    pub source: Option<String>,
    pub target: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchTranslateRequest {
    pub texts: Vec<String>,
    pub source: Option<String>,
    pub target: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoTranslateRequest {
    pub text: String,
    pub target: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchTranslateResponse {
    pub results: Vec<TranslationResult>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EvictResponse {
    pub removed: usize,
}

pub async fn health_handler<B: TranslationBackend>(State(state): State<AppState<B>>) -> Json<HealthResponse> {
    let mut checks = HashMap::new();
    let mut overall_status = HealthStatus::Healthy;

    let backend_check = if state.translator.backend().is_ready() {
        HealthCheck {
            status: "ok".to_string(),
            message: format!("API base: {}", state.config.translation.api_base_url),
        }
    } else {
        // Memory hits still work without a backend
        overall_status = HealthStatus::Degraded;
        HealthCheck {
            status: "warning".to_string(),
            message: "No API key configured; only cached translations are available".to_string(),
        }
    };
    checks.insert("translation_backend".to_string(), backend_check);

    let memory = state.translator.memory();
    let stats = memory.stats();
    let memory_check = HealthCheck {
        status: if memory.is_enabled() { "ok" } else { "disabled" }.to_string(),
        message: format!("{} entries, {} bytes", stats.total_entries, stats.total_size_bytes),
    };
    checks.insert("translation_memory".to_string(), memory_check);

    Json(HealthResponse {
        status: overall_status,
        checks,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Handler for /v1/translate
pub async fn translate_handler<B: TranslationBackend>(
    State(state): State<AppState<B>>,
    body: String,
) -> Result<Json<TranslationResult>> {
    let req: TranslateRequest = parse_body(&body)?;
    let source = resolve_language(req.source.as_deref(), state.config.translation.default_source_language)?;
    let target = resolve_language(req.target.as_deref(), state.config.translation.default_target_language)?;

    debug!("Translate request: {} -> {}, {} chars", source, target, req.text.len());
    let result = state.translator.translate(&req.text, source, target).await?;
    Ok(Json(result))
}

/// Handler for /v1/translate/batch
pub async fn batch_translate_handler<B: TranslationBackend>(
    State(state): State<AppState<B>>,
    body: String,
) -> Result<Json<BatchTranslateResponse>> {
    let req: BatchTranslateRequest = parse_body(&body)?;
    let source = resolve_language(req.source.as_deref(), state.config.translation.default_source_language)?;
    let target = resolve_language(req.target.as_deref(), state.config.translation.default_target_language)?;

    info!("Batch translate request: {} texts, {} -> {}", req.texts.len(), source, target);
    let results = state.translator.batch_translate(&req.texts, source, target).await?;
    Ok(Json(BatchTranslateResponse { results }))
}

/// Handler for /v1/translate/auto
pub async fn auto_translate_handler<B: TranslationBackend>(
    State(state): State<AppState<B>>,
    body: String,
) -> Result<Json<TranslationResult>> {
    let req: AutoTranslateRequest = parse_body(&body)?;
    let target = resolve_language(req.target.as_deref(), state.config.translation.default_target_language)?;

    let result = state.translator.auto_translate(&req.text, target).await?;
    Ok(Json(result))
}

pub async fn memory_stats_handler<B: TranslationBackend>(State(state): State<AppState<B>>) -> Json<MemoryStats> {
    Json(state.translator.memory().stats())
}

pub async fn clear_memory_handler<B: TranslationBackend>(State(state): State<AppState<B>>) -> StatusCode {
    state.translator.memory().clear();
    StatusCode::NO_CONTENT
}

pub async fn evict_memory_handler<B: TranslationBackend>(State(state): State<AppState<B>>) -> Json<EvictResponse> {
    let removed = state.translator.memory().evict_expired();
    Json(EvictResponse { removed })
}

/// Prometheus scrape endpoint
pub async fn metrics_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        gather_metrics(),
    )
}

/// Deserialize a JSON body, reporting failures in the API's error shape.
fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| {
        error!("Failed to deserialize request: {}", e);
        TranslateError::InvalidInput(format!("JSON deserialization error: {}", e))
    })
}

fn resolve_language(code: Option<&str>, default: Language) -> Result<Language> {
    code.map_or(Ok(default), str::parse)
}
