//! Cache Module
//!
//! Provides in-memory caching with lazy TTL expiration and LRU eviction.

mod entry;
mod lru;
mod stats;
mod store;


use std::sync::Arc;
use tokio::sync::RwLock;

// Re-export public types
pub use entry::{CacheEntry, ExpiryKind};
pub use lru::{Handle, LruList};
pub use stats::CacheStats;
pub use store::{CacheStore, Lookup};

/// The process-wide cache handle passed to every connection and to the
/// HTTP state. Reads and writes that touch recency take the write lock.
pub type SharedCache = Arc<RwLock<CacheStore>>;

/// Wraps a store for sharing across tasks.
pub fn shared(store: CacheStore) -> SharedCache {
    Arc::new(RwLock::new(store))
}
