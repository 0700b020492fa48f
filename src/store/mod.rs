// src/store/mod.rs
//! Key/value store backing the cache interceptor
//!
//! The engine only requires get/set with optional per-entry expiry and safe
//! concurrent use; last-write-wins per key is the consistency model. The
//! bundled [`MemoryStore`] keeps entries in a `DashMap` with lazy expiry
//! eviction. Durability is out of scope.

pub mod memory;

pub use memory::MemoryStore;

use crate::core::value::Value;
use std::time::Duration;

/// Concurrent get/set store with optional per-entry expiry
pub trait CacheStore: Send + Sync {
    /// Fetch the live value for `key`, if any
    fn get(&self, key: &str) -> Option<Value>;

    /// Store `value` under `key`; an entry with `expire_after` set is
    /// treated as absent once that duration has elapsed
    fn set(&self, key: &str, value: Value, expire_after: Option<Duration>);

    /// Drop the entry for `key`, if present
    fn remove(&self, key: &str);
}
