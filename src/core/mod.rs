// src/core/mod.rs
//! The interception core
//!
//! Everything a single intercepted call flows through:
//!
//! - **value**: type-erased argument/return cells
//! - **call_site**: static per-method descriptions and their cache
//! - **invocation**: per-(call × interceptor) contexts over shared state
//! - **engine**: the before → execute → after protocol
//! - **proxy**: forwarding objects routing interface calls into the engine
//!
//! # Control flow
//!
//! ```text
//! Caller
//!     │
//!     └─ ProxyObject::call ─→ InterceptionEngine::invoke
//!            ├─ resolve triggers → interceptors (registry)
//!            ├─ before-hooks (declaration order)
//!            ├─ real method (unless bypassed)
//!            └─ after-hooks (ordering strategy) ─→ result back to caller
//! ```

pub mod call_site;
pub mod engine;
pub mod invocation;
pub mod proxy;
pub mod value;

// Re-export commonly used types
pub use call_site::{CallSiteBuilder, CallSiteCache, MethodCallSite};
pub use engine::InterceptionEngine;
pub use invocation::InvocationContext;
pub use proxy::{ProxyBuilder, ProxyObject};
pub use value::Value;
