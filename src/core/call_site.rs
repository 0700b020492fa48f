// src/core/call_site.rs
//! Static call-site descriptions
//!
//! A [`MethodCallSite`] is the immutable, per-method-signature description
//! the engine dispatches on: owning type, method name, the triggers declared
//! on the method in declaration order, and the parameter count. Call-sites
//! are computed once per distinct method (builder API, no runtime
//! reflection) and cached in a [`CallSiteCache`] shared by all calls.

use crate::interceptors::trigger::TriggerRef;
use dashmap::DashMap;
use std::sync::Arc;

/// Immutable description of one interceptable method
#[derive(Debug)]
pub struct MethodCallSite {
    /// Name of the type that owns the method (e.g. "ClockService")
    owning_type: String,

    /// Method name (e.g. "now")
    method: String,

    /// Triggers declared on the method, in declaration order
    triggers: Vec<TriggerRef>,

    /// Number of declared parameters
    arity: usize,
}

impl MethodCallSite {
    /// Start building a call-site for `owning_type::method`
    pub fn builder(owning_type: impl Into<String>, method: impl Into<String>) -> CallSiteBuilder {
        CallSiteBuilder {
            owning_type: owning_type.into(),
            method: method.into(),
            triggers: Vec::new(),
            arity: 0,
        }
    }

    pub fn owning_type(&self) -> &str {
        &self.owning_type
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn triggers(&self) -> &[TriggerRef] {
        &self.triggers
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Fully qualified method identity, used for logging and cache keys
    pub fn identity(&self) -> String {
        format!("{}::{}", self.owning_type, self.method)
    }
}

/// Builder for [`MethodCallSite`]
pub struct CallSiteBuilder {
    owning_type: String,
    method: String,
    triggers: Vec<TriggerRef>,
    arity: usize,
}

impl CallSiteBuilder {
    /// Declare a trigger on the method; declaration order is preserved
    pub fn trigger(mut self, trigger: TriggerRef) -> Self {
        self.triggers.push(trigger);
        self
    }

    /// Declare the number of method parameters
    pub fn arity(mut self, arity: usize) -> Self {
        self.arity = arity;
        self
    }

    pub fn build(self) -> Arc<MethodCallSite> {
        Arc::new(MethodCallSite {
            owning_type: self.owning_type,
            method: self.method,
            triggers: self.triggers,
            arity: self.arity,
        })
    }
}

/// Concurrent method-name → call-site map, shared by all calls on a proxy
pub struct CallSiteCache {
    sites: DashMap<String, Arc<MethodCallSite>>,
}

impl CallSiteCache {
    pub fn new() -> Self {
        Self {
            sites: DashMap::new(),
        }
    }

    /// Register a call-site under its method name, replacing any previous one
    pub fn insert(&self, site: Arc<MethodCallSite>) {
        self.sites.insert(site.method().to_string(), site);
    }

    /// Look up the call-site for a method
    pub fn get(&self, method: &str) -> Option<Arc<MethodCallSite>> {
        self.sites.get(method).map(|entry| Arc::clone(entry.value()))
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

impl Default for CallSiteCache {
    fn default() -> Self {
        Self::new()
    }
}
