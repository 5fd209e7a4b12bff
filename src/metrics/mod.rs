// Metrics module: in-process cache counters and Prometheus observability
// Author: kelexine (https://github.com/kelexine)

mod registry;
mod stats;

pub use registry::{
    gather_metrics,
    REQUESTS_TOTAL,
    REQUEST_DURATION,
    PROVIDER_CALLS,
    PROVIDER_DURATION,
    CACHE_OPERATIONS,
    CACHE_ENTRIES,
};
pub use stats::{MetricsSnapshot, OperationMetrics, OperationSnapshot};

/// Helper to record HTTP request metrics
pub fn record_request(method: &str, endpoint: &str, status_code: u16, duration_secs: f64) {
    REQUESTS_TOTAL
        .with_label_values(&[method, endpoint, &status_code.to_string()])
        .inc();

    REQUEST_DURATION
        .with_label_values(&[method, endpoint])
        .observe(duration_secs);
}

/// Helper to record an upstream provider call
pub fn record_provider_call(operation: &str, success: bool, duration_secs: f64) {
    let outcome = if success { "success" } else { "failure" };
    PROVIDER_CALLS.with_label_values(&[operation, outcome]).inc();

    if success {
        PROVIDER_DURATION
            .with_label_values(&[operation])
            .observe(duration_secs);
    }
}

/// Helpers to record memoization cache operations
pub fn record_cache_hit(cache: &str) {
    CACHE_OPERATIONS.with_label_values(&[cache, "hit"]).inc();
}

pub fn record_cache_miss(cache: &str) {
    CACHE_OPERATIONS.with_label_values(&[cache, "miss"]).inc();
}

pub fn record_cache_eviction(cache: &str) {
    CACHE_OPERATIONS.with_label_values(&[cache, "eviction"]).inc();
}

pub fn update_cache_entries(cache: &str, count: usize) {
    CACHE_ENTRIES.with_label_values(&[cache]).set(count as f64);
}
