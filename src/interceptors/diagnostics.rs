// src/interceptors/diagnostics.rs
//! Call-timing interceptor
//!
//! Starts a monotonic timer in the before-hook and logs the elapsed
//! duration in the after-hook. The timer lives on the interceptor instance,
//! so this interceptor must be built fresh per call (which the registry
//! factory model guarantees); a single shared instance is not reentrant.

use crate::core::invocation::InvocationContext;
use crate::core::value::Value;
use crate::interceptors::trigger::Trigger;
use crate::interceptors::MethodInterceptor;
use crate::utils::errors::Result;
use parking_lot::Mutex;
use std::any::Any;
use std::time::Instant;
use tracing::info;

/// Declares call timing on a method
#[derive(Debug, Default)]
pub struct DiagnosticsTrigger;

impl Trigger for DiagnosticsTrigger {
    fn kind(&self) -> &'static str {
        "diagnostics"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Times the span between the before- and after-hooks of one call
#[derive(Default)]
pub struct DiagnosticsInterceptor {
    started: Mutex<Option<Instant>>,
}

impl DiagnosticsInterceptor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MethodInterceptor for DiagnosticsInterceptor {
    fn before_invoke(&self, _context: &InvocationContext) -> Result<()> {
        *self.started.lock() = Some(Instant::now());
        Ok(())
    }

    fn after_invoke(&self, context: &InvocationContext, _result: Option<&Value>) -> Result<()> {
        if let Some(started) = self.started.lock().take() {
            info!(
                "{} executed in {:?}",
                context.call_site().identity(),
                started.elapsed()
            );
        }
        Ok(())
    }
}
