// Metrics module for Prometheus observability
// Author: kelexine (https://github.com/kelexine)

mod registry;

pub use registry::{
    gather_metrics,
    TRANSLATION_REQUESTS,
    MEMORY_LOOKUPS,
    MEMORY_EVICTIONS,
    MEMORY_ENTRIES,
    MEMORY_STORAGE_FAILURES,
    BACKEND_CALLS,
    BACKEND_DURATION,
    BACKEND_TEXTS,
};

/// Helper to record a finished translate operation
pub fn record_translation(operation: &str, success: bool) {
    let outcome = if success { "success" } else { "error" };
    TRANSLATION_REQUESTS.with_label_values(&[operation, outcome]).inc();
}

/// Helpers to record translation memory lookups
pub fn record_exact_hit() {
    MEMORY_LOOKUPS.with_label_values(&["exact_hit"]).inc();
}

pub fn record_fuzzy_hit() {
    MEMORY_LOOKUPS.with_label_values(&["fuzzy_hit"]).inc();
}

pub fn record_memory_miss() {
    MEMORY_LOOKUPS.with_label_values(&["miss"]).inc();
}

pub fn record_evictions(count: usize) {
    MEMORY_EVICTIONS.inc_by(count as u64);
}

pub fn update_memory_entries(count: usize) {
    MEMORY_ENTRIES.set(count as f64);
}

/// Helper to record a swallowed persistence failure
pub fn record_storage_failure(operation: &str) {
    MEMORY_STORAGE_FAILURES.with_label_values(&[operation]).inc();
}

/// Helper to record translation API call metrics
pub fn record_backend_call(success: bool, texts: usize, duration_secs: f64) {
    let status = if success { "success" } else { "error" };
    BACKEND_CALLS.with_label_values(&[status]).inc();
    BACKEND_DURATION.with_label_values(&[status]).observe(duration_secs);
    BACKEND_TEXTS.inc_by(texts as u64);
}
