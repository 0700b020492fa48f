// src/config/mod.rs
//! Registration and configuration surface
//!
//! Everything the engine reads at dispatch time is assembled here, once, at
//! startup:
//!
//! - **registry**: trigger kind → interceptor factory mapping
//! - **ordering**: pyramid (LIFO) and sequential (FIFO) after-phase policies
//! - **proxy_config**: the immutable bundle of both, plus loadable settings

pub mod ordering;
pub mod proxy_config;
pub mod registry;

// Re-export commonly used types
pub use ordering::{OrderingStrategy, PyramidOrdering, SequentialOrdering};
pub use proxy_config::{OrderingMode, ProxyConfiguration, ProxyConfigurationBuilder, ProxySettings};
pub use registry::{factory, InterceptorFactory, InterceptorRegistry, ResolvedInterceptor};
