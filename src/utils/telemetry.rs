// src/utils/telemetry.rs
//! Tracing subscriber initialization
//!
//! The engine itself only emits `tracing` events; installing a subscriber is
//! the embedding application's job. This helper wires up the common case:
//! env-filtered, human-readable output.

use crate::utils::errors::{EngineError, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// Filter is taken from `RUST_LOG`, defaulting to `info`. Returns an error
/// if a global subscriber is already installed.
pub fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| EngineError::Config(format!("failed to install tracing subscriber: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_idempotence() {
        // First call may or may not win the race with other tests; the
        // second call must report the already-installed subscriber.
        let _ = init_tracing();
        assert!(init_tracing().is_err());
    }
}
