// In-process hit/miss counters and rolling latency per operation
// Author: kelexine (https://github.com/kelexine)

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Counters for one memoized operation type.
///
/// Hits only bump the counters; the average covers upstream calls.
#[derive(Debug, Default)]
pub struct OperationMetrics {
    inner: Mutex<Counters>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Counters {
    total_requests: u64,
    hit_count: u64,
    timed_calls: u64,
    average_latency_secs: f64,
}

/// Snapshot of an [`OperationMetrics`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperationSnapshot {
    pub total_requests: u64,
    pub hit_count: u64,
    pub rolling_average_latency: f64,
}

impl OperationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        let mut c = self.inner.lock();
        c.total_requests += 1;
        c.hit_count += 1;
    }

    /// Count a miss. Called before the provider runs, so a miss whose
    /// caller goes away mid-call is still counted.
    pub fn record_miss(&self) {
        self.inner.lock().total_requests += 1;
    }

    /// Fold a successful provider call's latency into the cumulative average.
    pub fn record_latency(&self, latency: Duration) {
        let mut c = self.inner.lock();
        c.timed_calls += 1;
        let sample = latency.as_secs_f64();
        c.average_latency_secs += (sample - c.average_latency_secs) / c.timed_calls as f64;
    }

    pub fn snapshot(&self) -> OperationSnapshot {
        let c = *self.inner.lock();
        OperationSnapshot {
            total_requests: c.total_requests,
            hit_count: c.hit_count,
            rolling_average_latency: c.average_latency_secs,
        }
    }

    pub fn reset(&self) {
        *self.inner.lock() = Counters::default();
    }
}

/// Aggregated counters exposed by the stats endpoint.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub comparisons_total: u64,
    pub comparisons_cached: u64,
    pub embeddings_total: u64,
    pub embeddings_cached: u64,
    /// Seconds
    pub avg_comparison_time: f64,
    /// Seconds
    pub avg_embedding_time: f64,
}

impl MetricsSnapshot {
    pub fn from_operations(comparison: OperationSnapshot, embedding: OperationSnapshot) -> Self {
        Self {
            comparisons_total: comparison.total_requests,
            comparisons_cached: comparison.hit_count,
            embeddings_total: embedding.total_requests,
            embeddings_cached: embedding.hit_count,
            avg_comparison_time: comparison.rolling_average_latency,
            avg_embedding_time: embedding.rolling_average_latency,
        }
    }
}
