// Google Cloud Translation v2 client
// Author: kelexine (https://github.com/kelexine)

use super::{BackendTranslation, TranslationBackend};
use crate::config::{ApiKey, TranslationConfig};
use crate::error::{TranslateError, Result};
use crate::metrics;
use crate::models::google::{GoogleErrorResponse, TranslateTextRequest, TranslateTextResponse};
use crate::models::Language;
use crate::utils::logging::sanitize;
use crate::utils::retry::{with_retry, RetryPolicy, TRANSPORT_ERROR};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Client for the Google Cloud Translation v2 API.
///
/// Authenticates with an API key passed as the `key` query parameter.
/// Rate limiting, server errors and transport failures are retried with
/// backoff.
pub struct GoogleTranslateClient {
    http_client: Client,
    api_key: ApiKey,
    base_url: String,
    retry: RetryPolicy,
}

impl GoogleTranslateClient {
    /// Create a client from the translation settings.
    ///
    /// Fails with `NotConfigured` when no API key is available.
    pub fn new(config: &TranslationConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                TranslateError::NotConfigured(
                    "no API key; set translation.api_key or GOOGLE_TRANSLATE_API_KEY".to_string(),
                )
            })?;

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .use_rustls_tls()
            .build()
            .map_err(|e| TranslateError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        debug!("Created translation client for {}", config.api_base_url);

        Ok(Self {
            http_client,
            api_key,
            base_url: config.api_base_url.clone(),
            retry: RetryPolicy::new(config.max_retries, Duration::from_millis(config.retry_delay_ms)),
        })
    }

    /// Replace the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Get the API endpoint
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST one translate request and decode its translations.
    async fn post_translate(&self, request: &TranslateTextRequest) -> Result<Vec<BackendTranslation>> {
        let client = &self.http_client;
        let url = self.base_url.as_str();
        let key = self.api_key.expose();
        let started = Instant::now();

        let outcome = with_retry("Translate", self.retry, move || async move {
            let response = client
                .post(url)
                .query(&[("key", key)])
                .json(request)
                .send()
                .await
                .map_err(|e| (TRANSPORT_ERROR, format!("HTTP error: {}", e.without_url())))?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| (TRANSPORT_ERROR, format!("Failed to read response body: {}", e.without_url())))?;

            if !status.is_success() {
                return Err((status.as_u16(), body));
            }
            Ok(body)
        })
        .await;

        let elapsed = started.elapsed().as_secs_f64();
        let result = outcome
            .map_err(|(status, body)| {
                error!("Translation API call failed: status {} - {}", status, sanitize(&body));
                if status == TRANSPORT_ERROR {
                    TranslateError::Backend(sanitize(&body))
                } else {
                    let message = GoogleErrorResponse::message_from(&body).unwrap_or(body);
                    TranslateError::from_status(status, &sanitize(&message))
                }
            })
            .and_then(|body| parse_translations(&body, request.q.len()));

        metrics::record_backend_call(result.is_ok(), request.q.len(), elapsed);
        if let Ok(translations) = &result {
            debug!("Translated {} texts in {:.3}s", translations.len(), elapsed);
        }
        result
    }
}

/// Decode a successful response, insisting on one translation per input.
fn parse_translations(body: &str, expected: usize) -> Result<Vec<BackendTranslation>> {
    let response: TranslateTextResponse = serde_json::from_str(body).map_err(|e| {
        error!("Failed to parse translation response: {}", e);
        TranslateError::Backend(format!("Malformed translation response: {}", e))
    })?;

    let data = response
        .data
        .ok_or_else(|| TranslateError::Backend("No translation data received".to_string()))?;

    if data.translations.len() != expected {
        return Err(TranslateError::Backend(format!(
            "Expected {} translations, received {}",
            expected,
            data.translations.len()
        )));
    }

    Ok(data
        .translations
        .into_iter()
        .map(|item| BackendTranslation {
            translated_text: item.translated_text,
            detected_language: item.detected_source_language,
        })
        .collect())
}

impl TranslationBackend for GoogleTranslateClient {
    async fn translate(
        &self,
        texts: &[String],
        source: Option<Language>,
        target: Language,
    ) -> Result<Vec<BackendTranslation>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = TranslateTextRequest {
            q: texts.to_vec(),
            source: source.map(|language| language.code().to_string()),
            target: target.code().to_string(),
            format: "text".to_string(),
        };

        debug!(
            "Calling translate API: {} texts, {} -> {}",
            texts.len(),
            source.map_or("auto", Language::code),
            target
        );

        self.post_translate(&request).await
    }
}
