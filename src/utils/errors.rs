// src/utils/errors.rs
//! Error types for the interception engine
//!
//! All fallible engine operations return [`Result`]. Errors raised by the
//! real (proxied) method cross the engine as [`EngineError::Target`] and
//! propagate to the caller unchanged in message and source chain.

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, EngineError>;

/// Interception phase in which an interceptor hook failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Before,
    After,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Before => write!(f, "before"),
            Phase::After => write!(f, "after"),
        }
    }
}

/// Engine error type
#[derive(Debug, Error)]
pub enum EngineError {
    /// A trigger is declared on a method but no interceptor is registered
    /// for it, and the configuration does not ignore unmatched triggers
    #[error("the trigger '{0}' is declared on the method, but no interceptor is registered to handle it")]
    UnconfiguredTrigger(String),

    /// A second interceptor was registered for an already-mapped trigger kind
    #[error("an interceptor is already registered for the trigger '{0}'")]
    DuplicateTrigger(String),

    /// Proxy construction failed (no target, or no dispatch table entry)
    #[error("proxy creation failed: {0}")]
    ProxyCreation(String),

    /// An interceptor hook raised an error; the call was aborted
    #[error("interceptor '{kind}' failed during the {phase} phase: {source}")]
    Interceptor {
        kind: String,
        phase: Phase,
        #[source]
        source: anyhow::Error,
    },

    /// The real method raised an error; after-hooks did not run
    #[error(transparent)]
    Target(#[from] anyhow::Error),

    /// A return value could not be downcast to the caller's expected type
    #[error("return value type mismatch for '{0}'")]
    ReturnType(String),

    /// Configuration loading or validation failed
    #[error("configuration error: {0}")]
    Config(String),
}

impl EngineError {
    /// Wrap a hook failure with its interceptor kind and phase
    pub fn interceptor(kind: impl Into<String>, phase: Phase, source: anyhow::Error) -> Self {
        Self::Interceptor {
            kind: kind.into(),
            phase,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EngineError::UnconfiguredTrigger("cache".to_string());
        assert!(err.to_string().contains("'cache'"));

        let err = EngineError::DuplicateTrigger("log".to_string());
        assert!(err.to_string().contains("'log'"));
    }

    #[test]
    fn test_interceptor_error_names_phase() {
        let err = EngineError::interceptor("cache", Phase::Before, anyhow::anyhow!("boom"));
        let msg = err.to_string();
        assert!(msg.contains("before"));
        assert!(msg.contains("boom"));
    }

    #[test]
    fn test_target_error_is_transparent() {
        let err: EngineError = anyhow::anyhow!("database unavailable").into();
        assert_eq!(err.to_string(), "database unavailable");
    }
}
