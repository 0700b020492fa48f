// src/utils/mod.rs
//! Common utilities shared across the engine
//!
//! - **errors**: `EngineError` and the crate-wide `Result` alias
//! - **telemetry**: tracing subscriber initialization

pub mod errors;
pub mod telemetry;

// Re-export commonly used types
pub use errors::{EngineError, Result};
pub use telemetry::init_tracing;
