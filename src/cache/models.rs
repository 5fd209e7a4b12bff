//! Cache statistics models.

// Author: kelexine (https://github.com/kelexine)

use serde::{Deserialize, Serialize};

/// Read-only snapshot of a single cache instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Entries currently held.
    pub size: usize,
    /// Configured capacity.
    pub max_size: usize,
    /// Default time-to-live applied on insert.
    pub ttl_seconds: u64,
}
