// Per-key in-flight coalescing for memoized calls
// Author: kelexine (https://github.com/kelexine)

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Serializes concurrent misses for the same key so that only the first
/// caller reaches the provider; later callers wake up to a warm cache.
#[derive(Default)]
pub struct InflightCoalescer {
    inflight: parking_lot::Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

/// Held while a caller owns the upstream call for a key.
///
/// Dropping it releases the key and forgets the lock once nobody else holds
/// or waits on it. A waiter cancelled inside `acquire` cleans up the same way.
pub struct InflightGuard<'a> {
    coalescer: &'a InflightCoalescer,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl InflightCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, key: &str) -> InflightGuard<'_> {
        // Declared before the lock future so that, if this call is cancelled
        // while waiting, the future's handle is released first and the
        // guard's drop can still forget the key.
        let mut pending = InflightGuard {
            coalescer: self,
            key: key.to_string(),
            guard: None,
        };

        let lock = {
            let mut inflight = self.inflight.lock();
            Arc::clone(
                inflight
                    .entry(key.to_string())
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };

        pending.guard = Some(lock.lock_owned().await);
        pending
    }

    /// Keys with a caller currently holding or waiting on them
    pub fn inflight_keys(&self) -> usize {
        self.inflight.lock().len()
    }
}

impl Drop for InflightGuard<'_> {
    fn drop(&mut self) {
        let mut inflight = self.coalescer.inflight.lock();
        drop(self.guard.take());
        if inflight
            .get(&self.key)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            inflight.remove(&self.key);
        }
    }
}
