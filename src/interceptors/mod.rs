// src/interceptors/mod.rs
//! Interceptor capability and bundled interceptors
//!
//! An interceptor is a behavior unit that runs around a method call:
//!
//! - **cache**: return-value caching with optional per-entry expiry
//! - **log**: structured before/after events at a trigger-declared level
//! - **console_log**: fixed-severity stdout variant of log
//! - **diagnostics**: wall-clock timing of the real call
//! - **unit_of_work**: fills a unit-of-work argument slot, commits after
//!
//! The engine treats interceptors opaquely through [`MethodInterceptor`];
//! they plug in by mapping their trigger kind to a factory in the
//! [`InterceptorRegistry`](crate::config::registry::InterceptorRegistry).

pub mod cache;
pub mod console_log;
pub mod diagnostics;
pub mod log;
pub mod trigger;
pub mod unit_of_work;

// Re-export commonly used types
pub use cache::{CacheInterceptor, CacheTrigger};
pub use console_log::{ConsoleLogInterceptor, ConsoleLogTrigger};
pub use diagnostics::{DiagnosticsInterceptor, DiagnosticsTrigger};
pub use log::{LogInterceptor, LogTrigger};
pub use trigger::{Trigger, TriggerRef};
pub use unit_of_work::{
    UnitOfWork, UnitOfWorkFactory, UnitOfWorkHandle, UnitOfWorkInterceptor, UnitOfWorkTrigger,
};

use crate::core::invocation::InvocationContext;
use crate::core::value::Value;
use crate::utils::errors::Result;

/// The interception capability: a before hook and an after hook.
///
/// `before_invoke` runs before the real method and may mutate arguments,
/// request bypass, or override the return value. `after_invoke` runs after
/// the working return value has settled and may overwrite it. An error from
/// either hook aborts the remaining hooks of that phase and fails the call.
pub trait MethodInterceptor: Send + Sync {
    fn before_invoke(&self, context: &InvocationContext) -> Result<()>;

    fn after_invoke(&self, context: &InvocationContext, result: Option<&Value>) -> Result<()>;
}
