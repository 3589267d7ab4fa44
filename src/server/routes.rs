// HTTP routes configuration
// Author: kelexine (https://github.com/kelexine)

use super::handlers::{
    auto_translate_handler, batch_translate_handler, clear_memory_handler, evict_memory_handler,
    health_handler, memory_stats_handler, metrics_handler, translate_handler,
};
use super::middleware::{cors_layer, request_id_layers};
use crate::backend::TranslationBackend;
use crate::config::AppConfig;
use crate::error::Result;
use crate::translator::Translator;
use axum::{routing::{delete, get, post}, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Request bodies are plain text fields; 2MB is far beyond any CMS section.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

pub struct AppState<B> {
    pub config: Arc<AppConfig>,
    pub translator: Arc<Translator<B>>,
}

// Manual impl: a derive would require `B: Clone`
impl<B> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            translator: Arc::clone(&self.translator),
        }
    }
}

pub fn create_router<B>(config: AppConfig, translator: Arc<Translator<B>>) -> Result<Router>
where
    B: TranslationBackend + 'static,
{
    let state = AppState {
        config: Arc::new(config),
        translator,
    };

    let (set_request_id, propagate_request_id) = request_id_layers();

    let app = Router::new()
        .route("/health", get(health_handler::<B>))
        .route("/metrics", get(metrics_handler))
        .route("/v1/translate", post(translate_handler::<B>))
        .route("/v1/translate/batch", post(batch_translate_handler::<B>))
        .route("/v1/translate/auto", post(auto_translate_handler::<B>))
        .route("/v1/memory", delete(clear_memory_handler::<B>))
        .route("/v1/memory/stats", get(memory_stats_handler::<B>))
        .route("/v1/memory/evict", post(evict_memory_handler::<B>))
        .layer(tower_http::limit::RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id)
        .layer(set_request_id)
        .with_state(state);

    Ok(app)
}
