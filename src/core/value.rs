// src/core/value.rs
//! Type-erased argument and return values
//!
//! The engine moves arguments and return values between interceptors without
//! knowing their concrete types. [`Value`] is a cheaply cloneable cell over
//! `Arc<dyn Any>`; the proxy layer downcasts at the typed boundary.
//!
//! A value built with [`Value::hashed`] additionally carries a content
//! fingerprint, which the cache interceptor uses to key entries by argument
//! values rather than by method name alone.

use std::any::{Any, TypeId};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A type-erased, shareable value flowing through an intercepted call
#[derive(Clone)]
pub struct Value {
    inner: Arc<dyn Any + Send + Sync>,
    fingerprint: Option<u64>,
}

impl Value {
    /// Wrap a value without a content fingerprint.
    ///
    /// Calls passing such an argument are opaque to the cache interceptor
    /// and will not be cached.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
            fingerprint: None,
        }
    }

    /// Wrap a hashable value, recording a content fingerprint.
    ///
    /// The concrete type is part of the fingerprint, so equal byte content
    /// of different types does not alias.
    pub fn hashed<T: Any + Send + Sync + Hash>(value: T) -> Self {
        let mut hasher = DefaultHasher::new();
        TypeId::of::<T>().hash(&mut hasher);
        value.hash(&mut hasher);
        let fingerprint = hasher.finish();

        Self {
            inner: Arc::new(value),
            fingerprint: Some(fingerprint),
        }
    }

    /// Borrow the value as `T`, if that is its concrete type
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Take the value out as `Arc<T>`, if that is its concrete type
    pub fn downcast_arc<T: Any + Send + Sync>(self) -> Option<Arc<T>> {
        Arc::downcast(self.inner).ok()
    }

    /// Whether the wrapped value is of concrete type `T`
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Content fingerprint, if the value was built with [`Value::hashed`]
    pub fn fingerprint(&self) -> Option<u64> {
        self.fingerprint
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.fingerprint {
            Some(fp) => write!(f, "Value(fingerprint={:#x})", fp),
            None => write!(f, "Value(opaque)"),
        }
    }
}
