// src/store/memory.rs
//! In-memory cache store
//!
//! `DashMap`-backed [`CacheStore`] with per-entry deadlines. Expired
//! entries are evicted lazily on read; a sweep can be forced with
//! [`MemoryStore::purge_expired`].

use crate::core::value::Value;
use crate::store::CacheStore;
use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::debug;

struct StoredEntry {
    value: Value,
    expires_at: Option<Instant>,
}

impl StoredEntry {
    fn is_expired(&self, now: Instant) -> bool {
        matches!(self.expires_at, Some(deadline) if now >= deadline)
    }
}

/// Concurrent in-memory store with lazy expiry eviction
pub struct MemoryStore {
    entries: DashMap<String, StoredEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Number of stored entries, including not-yet-evicted expired ones
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every expired entry now
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.entries.retain(|_, entry| !entry.is_expired(now));
    }
}

impl CacheStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        let now = Instant::now();

        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired(now) {
                return Some(entry.value.clone());
            }
        } else {
            return None;
        }

        // Expired: evict and report a miss
        debug!("Evicting expired cache entry '{}'", key);
        self.entries.remove(key);
        None
    }

    fn set(&self, key: &str, value: Value, expire_after: Option<Duration>) {
        let expires_at = expire_after.map(|ttl| Instant::now() + ttl);
        self.entries.insert(
            key.to_string(),
            StoredEntry { value, expires_at },
        );
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.get("k").is_none());

        store.set("k", Value::new(7i64), None);
        let value = store.get("k").unwrap();
        assert_eq!(value.downcast_ref::<i64>(), Some(&7));
    }

    #[test]
    fn test_last_write_wins() {
        let store = MemoryStore::new();
        store.set("k", Value::new(1i64), None);
        store.set("k", Value::new(2i64), None);

        let value = store.get("k").unwrap();
        assert_eq!(value.downcast_ref::<i64>(), Some(&2));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove() {
        let store = MemoryStore::new();
        store.set("k", Value::new(1i64), None);
        store.remove("k");
        assert!(store.get("k").is_none());
    }

    #[tokio::test]
    async fn test_expired_entry_reads_as_miss() {
        let store = MemoryStore::new();
        store.set("k", Value::new(1i64), Some(Duration::from_millis(20)));
        assert!(store.get("k").is_some());

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(store.get("k").is_none());
        // Eviction happened on read
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_purge_expired_sweeps() {
        let store = MemoryStore::new();
        store.set("short", Value::new(1i64), Some(Duration::from_millis(10)));
        store.set("long", Value::new(2i64), None);

        tokio::time::sleep(Duration::from_millis(30)).await;
        store.purge_expired();

        assert_eq!(store.len(), 1);
        assert!(store.get("long").is_some());
    }
}
