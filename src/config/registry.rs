// src/config/registry.rs
//! Trigger-kind → interceptor-factory registry
//!
//! Built once at configuration time and read-only afterwards. At most one
//! factory per trigger kind; factories produce a fresh interceptor instance
//! per call, so an interceptor may keep per-call state (e.g. the
//! diagnostics timer) without being shared between concurrent calls.

use crate::core::call_site::MethodCallSite;
use crate::interceptors::trigger::TriggerRef;
use crate::interceptors::MethodInterceptor;
use crate::utils::errors::{EngineError, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Produces one interceptor instance per call.
///
/// Dependencies of the interceptor (stores, factories, sinks) are captured
/// by the closure at registration time.
pub type InterceptorFactory = Arc<dyn Fn() -> Arc<dyn MethodInterceptor> + Send + Sync>;

/// Build an [`InterceptorFactory`] from a plain constructor closure
pub fn factory<I, F>(constructor: F) -> InterceptorFactory
where
    I: MethodInterceptor + 'static,
    F: Fn() -> I + Send + Sync + 'static,
{
    Arc::new(move || {
        let interceptor: Arc<dyn MethodInterceptor> = Arc::new(constructor());
        interceptor
    })
}

/// A resolved (trigger, interceptor) pair for one call, in declaration order
pub struct ResolvedInterceptor {
    pub trigger: TriggerRef,
    pub interceptor: Arc<dyn MethodInterceptor>,
}

impl fmt::Debug for ResolvedInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedInterceptor")
            .field("trigger", &self.trigger)
            .finish_non_exhaustive()
    }
}

/// Immutable map from trigger kind to interceptor factory
pub struct InterceptorRegistry {
    factories: HashMap<String, InterceptorFactory>,

    /// Skip unmatched triggers instead of failing the call
    ignore_unmatched: bool,
}

impl InterceptorRegistry {
    pub fn new(ignore_unmatched: bool) -> Self {
        Self {
            factories: HashMap::new(),
            ignore_unmatched,
        }
    }

    /// Map a trigger kind to an interceptor factory.
    ///
    /// Fails with [`EngineError::DuplicateTrigger`] if the kind is already
    /// mapped.
    pub fn register(
        &mut self,
        trigger_kind: impl Into<String>,
        factory: InterceptorFactory,
    ) -> Result<()> {
        let kind = trigger_kind.into();
        if self.factories.contains_key(&kind) {
            return Err(EngineError::DuplicateTrigger(kind));
        }

        debug!("Registered interceptor for trigger '{}'", kind);
        self.factories.insert(kind, factory);
        Ok(())
    }

    /// Resolve the interceptors applicable to a call-site, in declaration
    /// order, instantiating each one fresh for this call.
    ///
    /// An unmatched trigger is skipped when `ignore_unmatched` is set and
    /// fails with [`EngineError::UnconfiguredTrigger`] otherwise.
    pub fn resolve(&self, call_site: &MethodCallSite) -> Result<Vec<ResolvedInterceptor>> {
        let mut resolved = Vec::with_capacity(call_site.triggers().len());

        for trigger in call_site.triggers() {
            match self.factories.get(trigger.kind()) {
                Some(factory) => resolved.push(ResolvedInterceptor {
                    trigger: Arc::clone(trigger),
                    interceptor: factory(),
                }),
                None if self.ignore_unmatched => {
                    debug!(
                        "Skipping unmatched trigger '{}' on {}",
                        trigger.kind(),
                        call_site.identity()
                    );
                }
                None => {
                    return Err(EngineError::UnconfiguredTrigger(trigger.kind().to_string()));
                }
            }
        }

        Ok(resolved)
    }

    /// Whether unmatched triggers are silently skipped
    pub fn ignores_unmatched(&self) -> bool {
        self.ignore_unmatched
    }

    /// Number of registered trigger kinds
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for InterceptorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.factories.keys().collect();
        kinds.sort();
        f.debug_struct("InterceptorRegistry")
            .field("triggers", &kinds)
            .field("ignore_unmatched", &self.ignore_unmatched)
            .finish()
    }
}
