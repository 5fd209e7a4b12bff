//! Bounded in-memory cache with least-recently-used eviction and per-entry expiry.
//!
//! Recency lives in the ordering of the underlying [`lru::LruCache`]; entries only
//! carry their timestamps. Expiry is checked lazily on read, so no background
//! task is needed. All state sits behind a single `parking_lot::Mutex` that is
//! held for the in-memory mutation only.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use super::models::CacheStats;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::debug;

/// Upper bound applied when `inserted_at + ttl` would overflow.
const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 3600);

/// A memoized value together with its lifetime.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub inserted_at: Instant,
    pub expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn new(value: V, ttl: Duration) -> Self {
        let inserted_at = Instant::now();
        Self {
            value,
            inserted_at,
            expires_at: inserted_at
                .checked_add(ttl)
                .unwrap_or_else(|| inserted_at + MAX_TTL),
        }
    }

    /// An entry is logically absent from `expires_at` onwards.
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// LRU cache with a default time-to-live.
///
/// A `max_size` of zero is accepted: nothing is ever retained and every
/// lookup misses.
pub struct TtlLruCache<V> {
    name: &'static str,
    /// `None` when the cache was configured with zero capacity
    store: Mutex<Option<LruCache<String, CacheEntry<V>>>>,
    max_size: usize,
    ttl: Duration,
    evictions: AtomicU64,
}

impl<V: Clone> TtlLruCache<V> {
    /// Create a cache holding at most `max_size` live entries.
    pub fn new(name: &'static str, max_size: usize, ttl: Duration) -> Self {
        let store = NonZeroUsize::new(max_size).map(LruCache::new);
        if store.is_none() {
            debug!("{} cache configured with zero capacity, caching disabled", name);
        }

        Self {
            name,
            store: Mutex::new(store),
            max_size,
            ttl,
            evictions: AtomicU64::new(0),
        }
    }

    pub fn with_ttl_seconds(name: &'static str, max_size: usize, ttl_seconds: u64) -> Self {
        Self::new(name, max_size, Duration::from_secs(ttl_seconds))
    }

    /// Look up a live entry, refreshing its recency on a hit.
    ///
    /// An expired entry is dropped and reported as a miss.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut guard = self.store.lock();
        let store = guard.as_mut()?;
        let now = Instant::now();

        let expired = store.peek(key).map(|entry| entry.is_expired(now));
        match expired {
            Some(true) => {
                store.pop(key);
                debug!("{} cache entry expired: {}", self.name, key_prefix(key));
                None
            }
            Some(false) => store.get(key).map(|entry| entry.value.clone()),
            None => None,
        }
    }

    /// Insert or overwrite `key` using the cache-wide TTL.
    pub fn put(&self, key: impl Into<String>, value: V) {
        self.put_with_ttl(key, value, self.ttl);
    }

    /// Insert or overwrite `key` with an explicit TTL.
    ///
    /// Overwriting resets the expiry and moves the key to most-recently-used.
    /// Inserting a new key into a full cache evicts the least-recently-used
    /// entry first.
    pub fn put_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let mut guard = self.store.lock();
        let Some(store) = guard.as_mut() else {
            return;
        };

        let key = key.into();
        let existed = store.contains(&key);
        let displaced = store.push(key, CacheEntry::new(value, ttl));

        if let (false, Some((evicted, _))) = (existed, displaced) {
            self.evictions.fetch_add(1, Ordering::Relaxed);
            crate::metrics::record_cache_eviction(self.name);
            debug!("{} cache evicted LRU entry: {}", self.name, key_prefix(&evicted));
        }
    }

    /// Whether a live entry exists. Does not touch recency.
    pub fn contains(&self, key: &str) -> bool {
        let guard = self.store.lock();
        let now = Instant::now();
        guard
            .as_ref()
            .and_then(|store| store.peek(key))
            .is_some_and(|entry| !entry.is_expired(now))
    }

    /// Remove a single entry, returning its value if it was still live.
    pub fn remove(&self, key: &str) -> Option<V> {
        let mut guard = self.store.lock();
        let now = Instant::now();
        guard
            .as_mut()
            .and_then(|store| store.pop(key))
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.value)
    }

    /// Drop every entry.
    pub fn clear(&self) {
        if let Some(store) = self.store.lock().as_mut() {
            store.clear();
        }
        debug!("{} cache cleared", self.name);
    }

    /// Physically remove expired entries. Returns how many were dropped.
    ///
    /// Lookups already ignore expired entries; this only reclaims memory.
    pub fn purge_expired(&self) -> usize {
        let mut guard = self.store.lock();
        let Some(store) = guard.as_mut() else {
            return 0;
        };

        let now = Instant::now();
        let stale: Vec<String> = store
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &stale {
            store.pop(key);
        }
        stale.len()
    }

    /// Number of entries currently held, including expired ones not yet dropped.
    pub fn len(&self) -> usize {
        self.store.lock().as_ref().map_or(0, |store| store.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total LRU evictions since construction.
    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    /// Read-only snapshot; never changes recency.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.len(),
            max_size: self.max_size,
            ttl_seconds: self.ttl.as_secs(),
        }
    }
}

/// Short, log-friendly form of a derived key.
pub(crate) fn key_prefix(key: &str) -> &str {
    let end = key
        .char_indices()
        .nth(24)
        .map_or(key.len(), |(idx, _)| idx);
    &key[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    fn cache(max_size: usize) -> TtlLruCache<String> {
        TtlLruCache::with_ttl_seconds("test", max_size, 3600)
    }

    #[test]
    fn test_get_returns_stored_value() {
        let cache = cache(4);
        cache.put("a", "alpha".to_string());

        assert_eq!(cache.get("a"), Some("alpha".to_string()));
        assert_eq!(cache.get("b"), None);
    }

    #[test]
    fn test_overflow_evicts_least_recently_inserted() {
        let cache = cache(3);
        for key in ["a", "b", "c", "d"] {
            cache.put(key, key.to_uppercase());
        }

        assert_eq!(cache.len(), 3);
        assert!(!cache.contains("a"));
        assert!(cache.contains("b"));
        assert!(cache.contains("d"));
        assert_eq!(cache.evictions(), 1);
    }

    #[test]
    fn test_access_refreshes_recency() {
        let cache = cache(3);
        cache.put("a", "1".to_string());
        cache.put("b", "2".to_string());
        cache.put("c", "3".to_string());

        assert!(cache.get("a").is_some());
        cache.put("d", "4".to_string());

        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        assert!(cache.contains("c"));
        assert!(cache.contains("d"));
    }

    #[test]
    fn test_overwrite_refreshes_value_and_recency() {
        let cache = cache(2);
        cache.put("a", "old".to_string());
        cache.put("b", "b".to_string());
        cache.put("a", "new".to_string());
        cache.put("c", "c".to_string());

        assert_eq!(cache.get("a"), Some("new".to_string()));
        assert!(!cache.contains("b"));
        assert_eq!(cache.evictions(), 1);
    }

    #[test]
    fn test_expired_entry_is_a_miss_and_dropped() {
        let cache = cache(4);
        cache.put_with_ttl("short", "x".to_string(), Duration::from_millis(20));
        cache.put("long", "y".to_string());

        sleep(Duration::from_millis(40));

        assert_eq!(cache.get("short"), None);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("long"), Some("y".to_string()));
    }

    #[test]
    fn test_zero_ttl_never_serves() {
        let cache: TtlLruCache<u32> = TtlLruCache::new("test", 4, Duration::ZERO);
        cache.put("a", 1);
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn test_zero_capacity_is_permanent_miss() {
        let cache = cache(0);
        cache.put("a", "1".to_string());

        assert_eq!(cache.get("a"), None);
        assert!(cache.is_empty());
        assert_eq!(cache.stats().max_size, 0);
    }

    #[test]
    fn test_clear_empties_cache() {
        let cache = cache(4);
        cache.put("a", "1".to_string());
        cache.put("b", "2".to_string());

        cache.clear();

        assert_eq!(cache.stats().size, 0);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), None);
    }

    #[test]
    fn test_purge_expired() {
        let cache = cache(4);
        cache.put_with_ttl("a", "1".to_string(), Duration::from_millis(10));
        cache.put_with_ttl("b", "2".to_string(), Duration::from_millis(10));
        cache.put("c", "3".to_string());

        sleep(Duration::from_millis(30));

        assert_eq!(cache.purge_expired(), 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_remove() {
        let cache = cache(4);
        cache.put("a", "1".to_string());
        assert_eq!(cache.remove("a"), Some("1".to_string()));
        assert_eq!(cache.remove("a"), None);
    }

    #[test]
    fn test_stats_snapshot() {
        let cache = TtlLruCache::<String>::with_ttl_seconds("test", 10, 120);
        cache.put("a", "1".to_string());

        let stats = cache.stats();
        assert_eq!(stats.size, 1);
        assert_eq!(stats.max_size, 10);
        assert_eq!(stats.ttl_seconds, 120);
    }

    #[test]
    fn test_key_prefix_truncates() {
        assert_eq!(key_prefix("short"), "short");
        assert_eq!(key_prefix(&"x".repeat(100)).len(), 24);
    }
}
