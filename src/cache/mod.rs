// Cache module: LRU+TTL store, key derivation and memoized provider calls
// Author: kelexine (https://github.com/kelexine)

pub mod coalesce;
pub mod keys;
pub mod memo;
pub mod models;
pub mod store;

pub use keys::{comparison_key, derive_key, embedding_key, OperationKind};
pub use memo::Memoized;
pub use models::CacheStats;
pub use store::{CacheEntry, TtlLruCache};
