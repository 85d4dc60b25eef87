//! Cache Store Module
//!
//! Main cache engine combining a key index with the arena-backed LRU list
//! and lazy TTL expiration.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::cache::lru::Handle;
use crate::cache::{CacheEntry, CacheStats, ExpiryKind, LruList};

/// A key and its entry, as stored in one list node.
#[derive(Debug)]
struct Slot {
    key: String,
    entry: CacheEntry,
}

// == Lookup ==
/// Outcome of a cache read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Live value
    Hit(String),
    /// The entry existed but its ttl had elapsed; it has now been dropped
    Expired,
    /// No entry under this key
    Miss,
}

impl Lookup {
    pub fn is_hit(&self) -> bool {
        matches!(self, Lookup::Hit(_))
    }

    /// The live value, if any.
    pub fn value(self) -> Option<String> {
        match self {
            Lookup::Hit(value) => Some(value),
            Lookup::Expired | Lookup::Miss => None,
        }
    }
}

// == Cache Store ==
/// Capacity-bounded cache with LRU eviction and per-entry TTL.
///
/// The key index and the recency list are always mutated together through
/// `&mut self`, so wrapping the store in one lock makes every operation
/// atomic with respect to both structures.
#[derive(Debug)]
pub struct CacheStore {
    /// Key to list handle
    index: HashMap<String, Handle>,
    /// Recency order, head = most recently used
    order: LruList<Slot>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            index: HashMap::with_capacity(capacity),
            order: LruList::with_capacity(capacity),
            stats: CacheStats::new(),
            capacity,
        }
    }

    // == Set ==
    /// Stores a key-value pair with optional expiry.
    ///
    /// An existing key has its entry replaced wholesale (value, ttl, expiry
    /// kind and creation time) and becomes most recently used. A new key
    /// enters at the head; if that takes the cache over capacity the least
    /// recently used entry is evicted.
    pub fn set(&mut self, key: String, value: String, ttl: Option<i64>, expiry: ExpiryKind) {
        let entry = CacheEntry::new(value, ttl, expiry);

        if let Some(&handle) = self.index.get(&key) {
            if let Some(slot) = self.order.get_mut(handle) {
                slot.entry = entry;
            }
            self.order.move_to_front(handle);
            return;
        }

        let handle = self.order.push_front(Slot {
            key: key.clone(),
            entry,
        });
        self.index.insert(key, handle);

        if self.index.len() > self.capacity {
            self.evict_lru();
        }

        self.stats.set_total_entries(self.index.len());
    }

    // == Get ==
    /// Retrieves a value by key, evaluating its ttl against the clock.
    pub fn get(&mut self, key: &str) -> Lookup {
        self.get_at(key, Utc::now())
    }

    /// Retrieves a value by key, evaluating its ttl at `now`.
    ///
    /// A live entry becomes most recently used. An expired entry is removed
    /// from both the index and the list and reported as [`Lookup::Expired`].
    pub fn get_at(&mut self, key: &str, now: DateTime<Utc>) -> Lookup {
        let Some(&handle) = self.index.get(key) else {
            self.stats.record_miss();
            return Lookup::Miss;
        };

        let expired = self
            .order
            .get(handle)
            .is_some_and(|slot| slot.entry.is_expired_at(now));

        if expired {
            self.index.remove(key);
            self.order.remove(handle);
            self.stats.record_expiration();
            self.stats.set_total_entries(self.index.len());
            debug!(key, "dropped expired entry on read");
            return Lookup::Expired;
        }

        self.order.move_to_front(handle);
        match self.order.get(handle) {
            Some(slot) => {
                self.stats.record_hit();
                Lookup::Hit(slot.entry.value.clone())
            }
            None => {
                self.stats.record_miss();
                Lookup::Miss
            }
        }
    }

    // == Exists ==
    /// Membership test only.
    ///
    /// Recency is left untouched and the ttl is not evaluated: an entry
    /// whose ttl has elapsed but which has not been read since still counts.
    pub fn exists(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    fn evict_lru(&mut self) {
        if let Some(slot) = self.order.pop_back() {
            self.index.remove(&slot.key);
            self.stats.record_eviction();
            debug!(key = %slot.key, "evicted least recently used entry");
        }
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.index.len());
        stats
    }

    /// Keys from most to least recently used.
    pub fn keys_by_recency(&self) -> Vec<String> {
        self.order.iter().map(|slot| slot.key.clone()).collect()
    }

    /// Number of nodes in the recency list. Always equal to [`len`](Self::len).
    pub fn list_len(&self) -> usize {
        self.order.len()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::thread::sleep;

    fn set(store: &mut CacheStore, key: &str, value: &str) {
        store.set(key.to_string(), value.to_string(), None, ExpiryKind::None);
    }

    #[test]
    fn test_store_new() {
        let store = CacheStore::new(100);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.capacity(), 100);
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = CacheStore::new(100);

        set(&mut store, "key1", "value1");

        assert_eq!(store.get("key1"), Lookup::Hit("value1".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = CacheStore::new(100);
        assert_eq!(store.get("nonexistent"), Lookup::Miss);
    }

    #[test]
    fn test_store_overwrite_replaces_entry() {
        let mut store = CacheStore::new(100);

        store.set("key1".into(), "value1".into(), Some(1), ExpiryKind::Ex);
        set(&mut store, "key1", "value2");

        assert_eq!(store.len(), 1);
        // The ttl went away with the old entry
        let later = Utc::now() + Duration::seconds(10);
        assert_eq!(store.get_at("key1", later), Lookup::Hit("value2".to_string()));
    }

    #[test]
    fn test_store_ttl_expiration_evicts_on_read() {
        let mut store = CacheStore::new(100);
        store.set("key1".into(), "value1".into(), Some(1), ExpiryKind::Ex);

        let created = Utc::now();
        assert!(store.get_at("key1", created).is_hit());

        assert_eq!(store.get_at("key1", created + Duration::seconds(2)), Lookup::Expired);
        assert_eq!(store.len(), 0);
        assert_eq!(store.list_len(), 0);
        assert!(!store.exists("key1"));
        assert_eq!(store.get("key1"), Lookup::Miss);
    }

    #[test]
    fn test_store_ttl_expiration_real_clock() {
        let mut store = CacheStore::new(100);
        store.set("key1".into(), "value1".into(), Some(1), ExpiryKind::Ex);

        assert!(store.get("key1").is_hit());

        sleep(std::time::Duration::from_millis(1100));

        assert_eq!(store.get("key1"), Lookup::Expired);
    }

    #[test]
    fn test_exists_ignores_ttl_and_recency() {
        let mut store = CacheStore::new(2);
        store.set("a".into(), "1".into(), Some(0), ExpiryKind::Px);
        set(&mut store, "b", "2");

        // Expired but never read
        assert!(store.exists("a"));
        assert_eq!(store.keys_by_recency(), vec!["b", "a"]);

        // exists() on "a" must not save it from eviction
        set(&mut store, "c", "3");
        assert!(!store.exists("a"));
        assert!(store.exists("b"));
        assert!(store.exists("c"));
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut store = CacheStore::new(3);

        set(&mut store, "key1", "value1");
        set(&mut store, "key2", "value2");
        set(&mut store, "key3", "value3");
        set(&mut store, "key4", "value4");

        assert_eq!(store.len(), 3);
        assert_eq!(store.get("key1"), Lookup::Miss);
        assert!(store.get("key2").is_hit());
        assert!(store.get("key3").is_hit());
        assert!(store.get("key4").is_hit());
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_lru_touch_on_get() {
        let mut store = CacheStore::new(3);

        set(&mut store, "key1", "value1");
        set(&mut store, "key2", "value2");
        set(&mut store, "key3", "value3");

        store.get("key1");
        set(&mut store, "key4", "value4");

        assert!(store.get("key1").is_hit());
        assert_eq!(store.get("key2"), Lookup::Miss);
    }

    #[test]
    fn test_store_lru_touch_on_overwrite() {
        let mut store = CacheStore::new(2);

        set(&mut store, "a", "1");
        set(&mut store, "b", "2");
        set(&mut store, "a", "updated");
        set(&mut store, "c", "3");

        assert_eq!(store.keys_by_recency(), vec!["c", "a"]);
    }

    #[test]
    fn test_expired_read_frees_slot() {
        let mut store = CacheStore::new(2);
        store.set("a".into(), "1".into(), Some(1), ExpiryKind::Px);
        set(&mut store, "b", "2");

        let later = Utc::now() + Duration::seconds(1);
        assert_eq!(store.get_at("a", later), Lookup::Expired);

        set(&mut store, "c", "3");
        assert_eq!(store.len(), 2);
        assert!(store.exists("b"), "freed slot should absorb the insert");
        assert_eq!(store.stats().evictions, 0);
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut store = CacheStore::new(0);
        set(&mut store, "a", "1");

        assert!(store.is_empty());
        assert_eq!(store.list_len(), 0);
    }

    #[test]
    fn test_store_stats() {
        let mut store = CacheStore::new(100);

        set(&mut store, "key1", "value1");
        store.get("key1");
        store.get("nonexistent");

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }
}
