// src/core/proxy.rs
//! Forwarding proxy objects
//!
//! A [`ProxyObject`] wraps a concrete target and routes every call through
//! the [`InterceptionEngine`](crate::core::engine::InterceptionEngine). No
//! code generation is involved: the interface's methods are described once
//! as call-sites in the proxy's dispatch table, and a hand-written adapter
//! (typically a newtype implementing the interface trait) forwards each
//! method through [`ProxyObject::call`] with a closure over the real
//! target.
//!
//! The caller receives exactly what the engine produced, including
//! re-thrown errors; interception is invisible on both sides of the call.

use crate::config::proxy_config::ProxyConfiguration;
use crate::core::call_site::{CallSiteCache, MethodCallSite};
use crate::core::engine::InterceptionEngine;
use crate::core::value::Value;
use crate::utils::errors::{EngineError, Result};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// A forwarding object routing an interface's calls through the engine
pub struct ProxyObject<T: ?Sized + Send + Sync> {
    target: Arc<T>,
    engine: InterceptionEngine,
    sites: CallSiteCache,
}

impl<T: ?Sized + Send + Sync> ProxyObject<T> {
    /// Start building a proxy over `config`
    pub fn builder(config: Arc<ProxyConfiguration>) -> ProxyBuilder<T> {
        ProxyBuilder {
            config,
            target: None,
            sites: Vec::new(),
        }
    }

    /// The wrapped target
    pub fn target(&self) -> &Arc<T> {
        &self.target
    }

    fn site(&self, method: &str) -> Result<Arc<MethodCallSite>> {
        self.sites.get(method).ok_or_else(|| {
            EngineError::ProxyCreation(format!("no dispatch entry for method '{}'", method))
        })
    }

    /// Route a synchronous call through the engine and downcast the result.
    ///
    /// `target_fn` is the forwarding closure over the real method; it
    /// receives the wrapped target and the (possibly rewritten) arguments.
    pub fn call<R, F>(&self, method: &str, arguments: Vec<Value>, target_fn: F) -> Result<R>
    where
        R: Clone + Send + Sync + 'static,
        F: FnOnce(&T, Vec<Value>) -> Result<Option<Value>>,
    {
        let site = self.site(method)?;
        let target = &self.target;
        let result = self
            .engine
            .invoke(&site, arguments, move |args| target_fn(target.as_ref(), args))?;

        Self::downcast_result(result, &site)
    }

    /// Route a call with no return value through the engine
    pub fn call_unit<F>(&self, method: &str, arguments: Vec<Value>, target_fn: F) -> Result<()>
    where
        F: FnOnce(&T, Vec<Value>) -> Result<Option<Value>>,
    {
        let site = self.site(method)?;
        let target = &self.target;
        self.engine
            .invoke(&site, arguments, move |args| target_fn(target.as_ref(), args))?;
        Ok(())
    }

    /// Route an asynchronous call through the engine and downcast the
    /// settled result
    pub async fn call_async<R, F, Fut>(
        &self,
        method: &str,
        arguments: Vec<Value>,
        target_fn: F,
    ) -> Result<R>
    where
        R: Clone + Send + Sync + 'static,
        F: FnOnce(Arc<T>, Vec<Value>) -> Fut,
        Fut: Future<Output = Result<Option<Value>>> + Send,
    {
        let site = self.site(method)?;
        let target = Arc::clone(&self.target);
        let result = self
            .engine
            .invoke_async(&site, arguments, move |args| target_fn(target, args))
            .await?;

        Self::downcast_result(result, &site)
    }

    fn downcast_result<R>(result: Option<Value>, site: &MethodCallSite) -> Result<R>
    where
        R: Clone + Send + Sync + 'static,
    {
        result
            .and_then(|value| value.downcast_ref::<R>().cloned())
            .ok_or_else(|| EngineError::ReturnType(site.identity()))
    }
}

impl<T: ?Sized + Send + Sync> fmt::Debug for ProxyObject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyObject")
            .field("dispatch_entries", &self.sites.len())
            .finish_non_exhaustive()
    }
}

/// Builder assembling a proxy's target and dispatch table
pub struct ProxyBuilder<T: ?Sized + Send + Sync> {
    config: Arc<ProxyConfiguration>,
    target: Option<Arc<T>>,
    sites: Vec<Arc<MethodCallSite>>,
}

impl<T: ?Sized + Send + Sync> ProxyBuilder<T> {
    /// The concrete implementation behind the proxy
    pub fn target(mut self, target: Arc<T>) -> Self {
        self.target = Some(target);
        self
    }

    /// Add a method's call-site to the dispatch table
    pub fn site(mut self, site: Arc<MethodCallSite>) -> Self {
        self.sites.push(site);
        self
    }

    /// Validate and build the proxy.
    ///
    /// Fails with [`EngineError::ProxyCreation`] when no target was
    /// supplied or the dispatch table is empty.
    pub fn build(self) -> Result<ProxyObject<T>> {
        let target = self
            .target
            .ok_or_else(|| EngineError::ProxyCreation("no target supplied".to_string()))?;

        if self.sites.is_empty() {
            return Err(EngineError::ProxyCreation(
                "dispatch table is empty; no call-site can be produced".to_string(),
            ));
        }

        let sites = CallSiteCache::new();
        for site in self.sites {
            sites.insert(site);
        }

        Ok(ProxyObject {
            target,
            engine: InterceptionEngine::new(self.config),
            sites,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::proxy_config::ProxyConfigurationBuilder;
    use crate::config::registry::factory;
    use crate::interceptors::cache::{CacheInterceptor, CacheTrigger};
    use crate::interceptors::diagnostics::{DiagnosticsInterceptor, DiagnosticsTrigger};
    use crate::interceptors::log::{LogInterceptor, LogTrigger};
    use crate::store::{CacheStore, MemoryStore};
    use std::sync::atomic::{AtomicU64, Ordering};
    use tracing::Level;

    /// The "real" service behind the proxy
    struct ClockService {
        ticks: AtomicU64,
    }

    impl ClockService {
        fn new() -> Self {
            Self {
                ticks: AtomicU64::new(0),
            }
        }

        fn now(&self) -> u64 {
            self.ticks.fetch_add(1, Ordering::SeqCst) + 1
        }
    }

    fn plain_config() -> Arc<ProxyConfiguration> {
        Arc::new(ProxyConfigurationBuilder::new().build().unwrap())
    }

    #[test]
    fn test_build_requires_target() {
        let err = ProxyObject::<ClockService>::builder(plain_config())
            .site(MethodCallSite::builder("ClockService", "now").build())
            .build()
            .unwrap_err();
        assert!(matches!(err, EngineError::ProxyCreation(_)));
    }

    #[test]
    fn test_build_requires_dispatch_table() {
        let err = ProxyObject::builder(plain_config())
            .target(Arc::new(ClockService::new()))
            .build()
            .unwrap_err();
        assert!(matches!(err, EngineError::ProxyCreation(_)));
    }

    #[test]
    fn test_unknown_method_is_rejected() {
        let proxy = ProxyObject::builder(plain_config())
            .target(Arc::new(ClockService::new()))
            .site(MethodCallSite::builder("ClockService", "now").build())
            .build()
            .unwrap();

        let err = proxy
            .call::<u64, _>("later", vec![], |service, _| {
                Ok(Some(Value::new(service.now())))
            })
            .unwrap_err();
        assert!(matches!(err, EngineError::ProxyCreation(_)));
    }

    #[test]
    fn test_trigger_free_call_equals_direct_call() {
        let service = Arc::new(ClockService::new());
        let proxy = ProxyObject::builder(plain_config())
            .target(Arc::clone(&service))
            .site(MethodCallSite::builder("ClockService", "now").build())
            .build()
            .unwrap();

        let proxied: u64 = proxy
            .call("now", vec![], |service, _| Ok(Some(Value::new(service.now()))))
            .unwrap();
        let direct = service.now();

        assert_eq!(proxied, 1);
        assert_eq!(direct, 2);
    }

    #[test]
    fn test_return_type_mismatch_is_reported() {
        let proxy = ProxyObject::builder(plain_config())
            .target(Arc::new(ClockService::new()))
            .site(MethodCallSite::builder("ClockService", "now").build())
            .build()
            .unwrap();

        let err = proxy
            .call::<String, _>("now", vec![], |service, _| {
                Ok(Some(Value::new(service.now())))
            })
            .unwrap_err();
        assert!(matches!(err, EngineError::ReturnType(_)));
    }

    /// Full wiring: `[Log][Diagnostics][Cache]` on one
    /// method, pyramid ordering, cache idempotence observable end to end
    #[test]
    fn test_sample_wiring_log_diagnostics_cache() {
        let store: Arc<dyn CacheStore> = Arc::new(MemoryStore::new());

        let config = Arc::new(
            ProxyConfigurationBuilder::new()
                .interceptor("log", factory(LogInterceptor::new))
                .interceptor("diagnostics", factory(DiagnosticsInterceptor::new))
                .interceptor("cache", {
                    let store = Arc::clone(&store);
                    factory(move || CacheInterceptor::new(store.clone()))
                })
                .build()
                .unwrap(),
        );

        let proxy = ProxyObject::builder(config)
            .target(Arc::new(ClockService::new()))
            .site(
                MethodCallSite::builder("ClockService", "now")
                    .trigger(Arc::new(LogTrigger::new(Level::DEBUG)))
                    .trigger(Arc::new(DiagnosticsTrigger))
                    .trigger(Arc::new(CacheTrigger::new()))
                    .build(),
            )
            .build()
            .unwrap();

        let forward = |service: &ClockService, _args: Vec<Value>| Ok(Some(Value::new(service.now())));

        let first: u64 = proxy.call("now", vec![], forward).unwrap();
        let second: u64 = proxy.call("now", vec![], forward).unwrap();

        // Second call is served from cache; the clock ticked exactly once
        assert_eq!(first, 1);
        assert_eq!(second, 1);
        assert_eq!(proxy.target().ticks.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_async_call_through_proxy() {
        let store: Arc<dyn CacheStore> = Arc::new(MemoryStore::new());

        let config = Arc::new(
            ProxyConfigurationBuilder::new()
                .interceptor("cache", {
                    let store = Arc::clone(&store);
                    factory(move || CacheInterceptor::new(store.clone()))
                })
                .build()
                .unwrap(),
        );

        let proxy = ProxyObject::builder(config)
            .target(Arc::new(ClockService::new()))
            .site(
                MethodCallSite::builder("ClockService", "now_async")
                    .trigger(Arc::new(CacheTrigger::new()))
                    .build(),
            )
            .build()
            .unwrap();

        let forward = |service: Arc<ClockService>, _args: Vec<Value>| async move {
            tokio::task::yield_now().await;
            Ok(Some(Value::new(service.now())))
        };

        let first: u64 = proxy.call_async("now_async", vec![], forward).await.unwrap();
        let second: u64 = proxy.call_async("now_async", vec![], forward).await.unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 1);
    }
}
