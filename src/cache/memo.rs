//! Memoization wrapper around an expensive, side-effect-free provider call.
//!
//! A [`Memoized`] owns one [`TtlLruCache`] and the counters for one operation
//! kind. Callers normalize their input and derive the key first; `call` then
//! either serves the cached value or runs the operation, times it, and stores
//! the result. Failed calls are never cached.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use super::coalesce::InflightCoalescer;
use super::keys::OperationKind;
use super::models::CacheStats;
use super::store::{key_prefix, TtlLruCache};
use crate::metrics::{self, OperationMetrics, OperationSnapshot};
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub struct Memoized<V> {
    kind: OperationKind,
    cache: TtlLruCache<V>,
    metrics: OperationMetrics,
    coalescer: Option<InflightCoalescer>,
}

impl<V: Clone> Memoized<V> {
    pub fn new(kind: OperationKind, max_size: usize, ttl: Duration) -> Self {
        Self {
            kind,
            cache: TtlLruCache::new(kind.as_str(), max_size, ttl),
            metrics: OperationMetrics::new(),
            coalescer: None,
        }
    }

    /// Make concurrent misses for the same key share one upstream call.
    pub fn with_coalescing(mut self, enabled: bool) -> Self {
        self.coalescer = enabled.then(InflightCoalescer::new);
        self
    }

    /// Serve `key` from the cache, or run `operation` and cache its result.
    ///
    /// The cache lock is never held while `operation` runs. Without coalescing,
    /// concurrent misses for the same key each run `operation` and the last
    /// write wins.
    pub async fn call<F, Fut, E>(&self, key: String, operation: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
        E: std::fmt::Display,
    {
        if let Some(value) = self.lookup(&key) {
            return Ok(value);
        }

        let _inflight = match &self.coalescer {
            Some(coalescer) => {
                let guard = coalescer.acquire(&key).await;
                // Another caller may have filled the entry while we waited
                if let Some(value) = self.lookup(&key) {
                    return Ok(value);
                }
                Some(guard)
            }
            None => None,
        };

        debug!("{} cache miss: {}", self.kind, key_prefix(&key));
        // Both counters move together, before the call can be cancelled
        self.metrics.record_miss();
        metrics::record_cache_miss(self.kind.as_str());

        let start = Instant::now();
        match operation().await {
            Ok(value) => {
                let elapsed = start.elapsed();
                self.metrics.record_latency(elapsed);
                metrics::record_provider_call(self.kind.as_str(), true, elapsed.as_secs_f64());

                self.cache.put(key, value.clone());
                metrics::update_cache_entries(self.kind.as_str(), self.cache.len());
                debug!("{} computed in {:?}", self.kind, elapsed);
                Ok(value)
            }
            Err(e) => {
                metrics::record_provider_call(self.kind.as_str(), false, 0.0);
                warn!("{} call failed, not caching: {}", self.kind, e);
                Err(e)
            }
        }
    }

    fn lookup(&self, key: &str) -> Option<V> {
        let value = self.cache.get(key)?;
        self.metrics.record_hit();
        metrics::record_cache_hit(self.kind.as_str());
        debug!("{} cache hit: {}", self.kind, key_prefix(key));
        Some(value)
    }

    pub fn cache(&self) -> &TtlLruCache<V> {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn metrics(&self) -> OperationSnapshot {
        self.metrics.snapshot()
    }

    /// Empty the cache and optionally zero the counters.
    pub fn clear(&self, reset_metrics: bool) {
        self.cache.clear();
        metrics::update_cache_entries(self.kind.as_str(), 0);
        if reset_metrics {
            self.metrics.reset();
        }
    }
}
