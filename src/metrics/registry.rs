// Prometheus metrics registry and collectors
// Author: kelexine (https://github.com/kelexine)

use lazy_static::lazy_static;
use prometheus::{
    CounterVec, HistogramVec, Gauge, IntCounter, Opts, Registry, TextEncoder, Encoder,
    register_counter_vec_with_registry, register_histogram_vec_with_registry,
    register_gauge_with_registry, register_int_counter_with_registry,
};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // ============================================================================
    // TRANSLATION METRICS
    // ============================================================================

    /// Translate operations by outcome
    pub static ref TRANSLATION_REQUESTS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("translation_requests_total", "Total translation operations"),
        &["operation", "outcome"], // operation: translate, batch, auto, fields
        REGISTRY
    ).unwrap();

    // ============================================================================
    // MEMORY METRICS
    // ============================================================================

    /// Translation memory lookups
    pub static ref MEMORY_LOOKUPS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("memory_lookups_total", "Total translation memory lookups"),
        &["result"], // result: exact_hit, fuzzy_hit, miss
        REGISTRY
    ).unwrap();

    /// Entries dropped by TTL eviction
    pub static ref MEMORY_EVICTIONS: IntCounter = register_int_counter_with_registry!(
        Opts::new("memory_evictions_total", "Total expired translation memory entries removed"),
        REGISTRY
    ).unwrap();

    /// Current number of memory keys
    pub static ref MEMORY_ENTRIES: Gauge = register_gauge_with_registry!(
        Opts::new("memory_entries_current", "Current number of translation memory entries"),
        REGISTRY
    ).unwrap();

    /// Swallowed persistence problems
    pub static ref MEMORY_STORAGE_FAILURES: CounterVec = register_counter_vec_with_registry!(
        Opts::new("memory_storage_failures_total", "Translation memory persistence failures"),
        &["operation"], // operation: load, save, remove, corrupt
        REGISTRY
    ).unwrap();

    // ============================================================================
    // BACKEND METRICS
    // ============================================================================

    /// Calls to the translation API
    pub static ref BACKEND_CALLS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("backend_calls_total", "Total translation API calls"),
        &["status"], // status: success, error
        REGISTRY
    ).unwrap();

    /// Translation API call duration
    pub static ref BACKEND_DURATION: HistogramVec = register_histogram_vec_with_registry!(
        prometheus::HistogramOpts::new("backend_call_duration_seconds", "Translation API call duration")
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["status"],
        REGISTRY
    ).unwrap();

    /// Texts sent to the translation API
    pub static ref BACKEND_TEXTS: IntCounter = register_int_counter_with_registry!(
        Opts::new("backend_texts_total", "Total texts sent to the translation API"),
        REGISTRY
    ).unwrap();
}

/// Gather all metrics and return as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration() {
        // Vec metrics only show up once a label set has been touched
        TRANSLATION_REQUESTS.with_label_values(&["translate", "success"]).inc();
        MEMORY_LOOKUPS.with_label_values(&["miss"]).inc();
        BACKEND_CALLS.with_label_values(&["success"]).inc();

        let metrics = gather_metrics();
        assert!(metrics.contains("translation_requests_total"));
        assert!(metrics.contains("memory_lookups_total"));
        assert!(metrics.contains("memory_entries_current"));
        assert!(metrics.contains("backend_calls_total"));
    }
}
