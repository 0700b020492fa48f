// src/core/engine.rs
//! The interception engine
//!
//! One engine instance orchestrates every call routed through a proxy:
//! resolve the interceptors matching the call-site, build one context per
//! match over a shared call state, then drive the before → execute → after
//! protocol.
//!
//! Protocol contracts:
//!
//! - Zero matches: the target runs directly; no context is built and no
//!   interceptor is instantiated.
//! - Every resolved interceptor receives its before-hook, even after an
//!   earlier hook requested bypass; bypass only skips the real call.
//! - A bypassed call's working value is the last override written in
//!   before-order.
//! - A target error propagates immediately; the after phase does not run.
//! - A hook error aborts the remaining hooks of its phase (and, in the
//!   before phase, the real call) and fails the call; nothing is retried.
//! - Async call-sites: before-hooks run synchronously, the engine awaits
//!   the target, and the after phase sees only the settled value.
//!
//! The engine holds no mutable state of its own; the shared configuration
//! is read-only, so arbitrarily many calls may run concurrently.

use crate::config::proxy_config::ProxyConfiguration;
use crate::core::call_site::MethodCallSite;
use crate::core::invocation::{InvocationContext, SharedCallState};
use crate::core::value::Value;
use crate::utils::errors::{EngineError, Phase, Result};
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// Orchestrates the interception protocol for one proxied target
#[derive(Clone)]
pub struct InterceptionEngine {
    config: Arc<ProxyConfiguration>,
}

impl InterceptionEngine {
    pub fn new(config: Arc<ProxyConfiguration>) -> Self {
        Self { config }
    }

    pub fn configuration(&self) -> &ProxyConfiguration {
        &self.config
    }

    /// Run a synchronous call through the interception protocol.
    ///
    /// `target` is a closure over the real method; it receives the argument
    /// list as mutated by the before phase and is skipped entirely when any
    /// before-hook requested bypass.
    pub fn invoke<F>(
        &self,
        call_site: &Arc<MethodCallSite>,
        arguments: Vec<Value>,
        target: F,
    ) -> Result<Option<Value>>
    where
        F: FnOnce(Vec<Value>) -> Result<Option<Value>>,
    {
        let contexts = match self.prepare(call_site, arguments)? {
            Prepared::FastPath(arguments) => {
                debug!("No interceptors for {}; direct call", call_site.identity());
                return target(arguments);
            }
            Prepared::Intercepted(contexts) => contexts,
        };
        let state = contexts.state.clone();

        self.run_before(&contexts.contexts)?;

        if state.bypass_requested() {
            debug!("Bypass requested for {}; skipping target", call_site.identity());
        } else {
            let result = target(state.arguments())?;
            state.set_return_value(result);
        }

        self.run_after(&contexts.contexts)?;
        Ok(state.return_value())
    }

    /// Run an asynchronous call through the interception protocol.
    ///
    /// The before phase completes synchronously before the target future is
    /// awaited; the after phase runs only once that future has settled with
    /// a value. A cancelled or timed-out target surfaces as an error from
    /// the future and is treated exactly like a thrown error.
    pub async fn invoke_async<F, Fut>(
        &self,
        call_site: &Arc<MethodCallSite>,
        arguments: Vec<Value>,
        target: F,
    ) -> Result<Option<Value>>
    where
        F: FnOnce(Vec<Value>) -> Fut,
        Fut: Future<Output = Result<Option<Value>>> + Send,
    {
        let contexts = match self.prepare(call_site, arguments)? {
            Prepared::FastPath(arguments) => {
                debug!("No interceptors for {}; direct call", call_site.identity());
                return target(arguments).await;
            }
            Prepared::Intercepted(contexts) => contexts,
        };
        let state = contexts.state.clone();

        self.run_before(&contexts.contexts)?;

        if state.bypass_requested() {
            debug!("Bypass requested for {}; skipping target", call_site.identity());
        } else {
            let result = target(state.arguments()).await?;
            state.set_return_value(result);
        }

        self.run_after(&contexts.contexts)?;
        Ok(state.return_value())
    }

    /// Resolve interceptors and build the call's contexts, or hand the
    /// arguments back for the fast path
    fn prepare(&self, call_site: &Arc<MethodCallSite>, arguments: Vec<Value>) -> Result<Prepared> {
        let resolved = self.config.registry().resolve(call_site)?;

        if resolved.is_empty() {
            return Ok(Prepared::FastPath(arguments));
        }

        let state = SharedCallState::new(arguments);
        let contexts = resolved
            .into_iter()
            .enumerate()
            .map(|(order, pair)| {
                InvocationContext::new(
                    Arc::clone(call_site),
                    pair.trigger,
                    pair.interceptor,
                    state.clone(),
                    order,
                )
            })
            .collect();

        Ok(Prepared::Intercepted(CallContexts { contexts, state }))
    }

    /// Before phase: every context, in before-order, regardless of bypass
    fn run_before(&self, contexts: &[InvocationContext]) -> Result<()> {
        for context in self.config.ordering().order_before(contexts) {
            context.interceptor().before_invoke(context).map_err(|e| {
                EngineError::interceptor(context.trigger().kind(), Phase::Before, e.into())
            })?;
        }
        Ok(())
    }

    /// After phase: every context, in after-order, over the working value
    fn run_after(&self, contexts: &[InvocationContext]) -> Result<()> {
        for context in self.config.ordering().order_after(contexts) {
            let working = context.return_value();
            context
                .interceptor()
                .after_invoke(context, working.as_ref())
                .map_err(|e| {
                    EngineError::interceptor(context.trigger().kind(), Phase::After, e.into())
                })?;
        }
        Ok(())
    }
}

/// A prepared call: either the trigger-free fast path or the built contexts
enum Prepared {
    FastPath(Vec<Value>),
    Intercepted(CallContexts),
}

struct CallContexts {
    contexts: Vec<InvocationContext>,
    state: SharedCallState,
}
