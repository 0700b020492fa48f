// src/config/proxy_config.rs
//! Proxy configuration
//!
//! [`ProxyConfiguration`] bundles everything the engine needs to dispatch a
//! call: the interceptor registry and the ordering strategy. It is built
//! once through the fluent [`ProxyConfigurationBuilder`], immutable
//! thereafter, and shared read-only by all concurrent calls.
//!
//! [`ProxySettings`] is the deserializable knob surface (ordering mode,
//! unmatched-trigger handling) loadable from a file and `WEAVE_*`
//! environment overrides.

use crate::config::ordering::{OrderingStrategy, PyramidOrdering, SequentialOrdering};
use crate::config::registry::{InterceptorFactory, InterceptorRegistry};
use crate::utils::errors::{EngineError, Result};
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Immutable configuration shared by all calls routed through one engine
pub struct ProxyConfiguration {
    registry: InterceptorRegistry,
    ordering: Arc<dyn OrderingStrategy>,
}

impl ProxyConfiguration {
    /// Start a fluent configuration chain
    pub fn builder() -> ProxyConfigurationBuilder {
        ProxyConfigurationBuilder::new()
    }

    pub fn registry(&self) -> &InterceptorRegistry {
        &self.registry
    }

    pub fn ordering(&self) -> &dyn OrderingStrategy {
        self.ordering.as_ref()
    }
}

impl fmt::Debug for ProxyConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfiguration")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

/// Fluent builder for [`ProxyConfiguration`]
pub struct ProxyConfigurationBuilder {
    interceptors: Vec<(String, InterceptorFactory)>,
    ordering: Arc<dyn OrderingStrategy>,
    ignore_unmatched: bool,
}

impl ProxyConfigurationBuilder {
    pub fn new() -> Self {
        Self {
            interceptors: Vec::new(),
            ordering: Arc::new(PyramidOrdering),
            ignore_unmatched: true,
        }
    }

    /// Map a trigger kind to an interceptor factory.
    ///
    /// Duplicate registrations are reported by [`Self::build`].
    pub fn interceptor(
        mut self,
        trigger_kind: impl Into<String>,
        factory: InterceptorFactory,
    ) -> Self {
        self.interceptors.push((trigger_kind.into(), factory));
        self
    }

    /// Select the ordering strategy (default: pyramid)
    pub fn ordering(mut self, strategy: Arc<dyn OrderingStrategy>) -> Self {
        self.ordering = strategy;
        self
    }

    /// Whether a declared trigger with no registered interceptor is skipped
    /// (true, default) or fails the call (false)
    pub fn ignore_unmatched(mut self, ignore: bool) -> Self {
        self.ignore_unmatched = ignore;
        self
    }

    /// Apply ordering mode and unmatched-trigger handling from settings
    pub fn settings(self, settings: &ProxySettings) -> Self {
        self.ordering(settings.ordering.strategy())
            .ignore_unmatched(settings.ignore_unmatched)
    }

    /// Validate the chain and freeze the configuration.
    ///
    /// Fails with [`EngineError::DuplicateTrigger`] if a trigger kind was
    /// mapped twice.
    pub fn build(self) -> Result<ProxyConfiguration> {
        let mut registry = InterceptorRegistry::new(self.ignore_unmatched);

        for (kind, factory) in self.interceptors {
            registry.register(kind, factory)?;
        }

        info!("Proxy configuration built with {} interceptor(s)", registry.len());

        Ok(ProxyConfiguration {
            registry,
            ordering: self.ordering,
        })
    }
}

impl Default for ProxyConfigurationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Ordering strategy selection in settings form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderingMode {
    Pyramid,
    Sequential,
}

impl OrderingMode {
    /// Instantiate the strategy this mode names
    pub fn strategy(self) -> Arc<dyn OrderingStrategy> {
        match self {
            OrderingMode::Pyramid => Arc::new(PyramidOrdering),
            OrderingMode::Sequential => Arc::new(SequentialOrdering),
        }
    }
}

/// Deserializable proxy settings
#[derive(Debug, Clone, Deserialize)]
pub struct ProxySettings {
    /// After-phase ordering discipline
    pub ordering: OrderingMode,

    /// Skip triggers with no registered interceptor instead of failing
    pub ignore_unmatched: bool,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            ordering: OrderingMode::Pyramid,
            ignore_unmatched: true,
        }
    }
}

impl ProxySettings {
    /// Load settings from an optional `weave` config file in the working
    /// directory, overridden by `WEAVE_*` environment variables.
    pub fn load() -> Result<Self> {
        Self::load_from("weave")
    }

    /// Load settings from the named config file (any format the `config`
    /// crate understands), overridden by `WEAVE_*` environment variables.
    pub fn load_from(file_name: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("ordering", "pyramid")
            .map_err(|e| EngineError::Config(e.to_string()))?
            .set_default("ignore_unmatched", true)
            .map_err(|e| EngineError::Config(e.to_string()))?
            .add_source(config::File::with_name(file_name).required(false))
            .add_source(config::Environment::with_prefix("WEAVE"))
            .build()
            .map_err(|e| EngineError::Config(e.to_string()))?;

        settings
            .try_deserialize()
            .map_err(|e| EngineError::Config(e.to_string()))
    }
}
