// src/lib.rs
//! Weave Engine — in-process call interception
//!
//! Declarative triggers on a method cause registered interceptors to run
//! before and after the real call, without the caller or callee knowing
//! interception occurred.
//!
//! # Architecture
//!
//! The engine is structured into several key modules:
//!
//! - **core**: the interception engine, invocation contexts, call-sites,
//!   and forwarding proxy objects
//! - **config**: interceptor registry, ordering strategies, and the
//!   immutable proxy configuration built once at startup
//! - **interceptors**: the bundled cache/log/diagnostics/unit-of-work
//!   interceptors and the trigger trait they hang off
//! - **store**: the key/value store backing the cache interceptor
//! - **utils**: errors and telemetry
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use weave_engine::config::ProxyConfiguration;
//! use weave_engine::core::{MethodCallSite, ProxyObject, Value};
//! use weave_engine::interceptors::{CacheInterceptor, CacheTrigger};
//! use weave_engine::store::{CacheStore, MemoryStore};
//!
//! # fn main() -> weave_engine::Result<()> {
//! let store: Arc<dyn CacheStore> = Arc::new(MemoryStore::new());
//! let config = Arc::new(
//!     ProxyConfiguration::builder()
//!         .interceptor("cache", {
//!             let store = Arc::clone(&store);
//!             weave_engine::config::factory(move || CacheInterceptor::new(store.clone()))
//!         })
//!         .build()?,
//! );
//!
//! struct Answers;
//! impl Answers {
//!     fn answer(&self) -> i64 {
//!         42
//!     }
//! }
//!
//! let proxy = ProxyObject::builder(config)
//!     .target(Arc::new(Answers))
//!     .site(
//!         MethodCallSite::builder("Answers", "answer")
//!             .trigger(Arc::new(CacheTrigger::new()))
//!             .build(),
//!     )
//!     .build()?;
//!
//! let answer: i64 = proxy.call("answer", vec![], |service, _| {
//!     Ok(Some(Value::new(service.answer())))
//! })?;
//! assert_eq!(answer, 42);
//! # Ok(())
//! # }
//! ```

// Public module exports
pub mod config;
pub mod core;
pub mod interceptors;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use self::config::{OrderingStrategy, ProxyConfiguration, PyramidOrdering, SequentialOrdering};
pub use self::core::{InterceptionEngine, InvocationContext, MethodCallSite, ProxyObject, Value};
pub use self::interceptors::{MethodInterceptor, Trigger};
pub use self::utils::errors::{EngineError, Result};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
