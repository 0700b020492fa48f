// src/interceptors/log.rs
//! Method logging interceptor
//!
//! Emits one `tracing` event before and one after the real call, at the
//! severity declared on the trigger, naming the owning type and method.

use crate::core::invocation::InvocationContext;
use crate::core::value::Value;
use crate::interceptors::trigger::Trigger;
use crate::interceptors::MethodInterceptor;
use crate::utils::errors::Result;
use std::any::Any;
use tracing::{debug, error, info, trace, warn, Level};

/// Declares logging on a method at the given severity
#[derive(Debug)]
pub struct LogTrigger {
    pub level: Level,
}

impl LogTrigger {
    pub fn new(level: Level) -> Self {
        Self { level }
    }
}

impl Trigger for LogTrigger {
    fn kind(&self) -> &'static str {
        "log"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Logs method entry and exit through `tracing`
#[derive(Default)]
pub struct LogInterceptor;

impl LogInterceptor {
    pub fn new() -> Self {
        Self
    }

    fn emit(level: Level, owning_type: &str, method: &str, stage: &str) {
        // `tracing::event!` needs a const level; dispatch by hand
        if level == Level::ERROR {
            error!("{}: method {}: {}", owning_type, stage, method);
        } else if level == Level::WARN {
            warn!("{}: method {}: {}", owning_type, stage, method);
        } else if level == Level::INFO {
            info!("{}: method {}: {}", owning_type, stage, method);
        } else if level == Level::DEBUG {
            debug!("{}: method {}: {}", owning_type, stage, method);
        } else {
            trace!("{}: method {}: {}", owning_type, stage, method);
        }
    }

    fn level_of(context: &InvocationContext) -> Level {
        context
            .trigger_as::<LogTrigger>()
            .map(|t| t.level)
            .unwrap_or(Level::INFO)
    }
}

impl MethodInterceptor for LogInterceptor {
    fn before_invoke(&self, context: &InvocationContext) -> Result<()> {
        let site = context.call_site();
        Self::emit(
            Self::level_of(context),
            site.owning_type(),
            site.method(),
            "executing",
        );
        Ok(())
    }

    fn after_invoke(&self, context: &InvocationContext, _result: Option<&Value>) -> Result<()> {
        let site = context.call_site();
        Self::emit(
            Self::level_of(context),
            site.owning_type(),
            site.method(),
            "executed",
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::proxy_config::ProxyConfiguration;
    use crate::core::call_site::MethodCallSite;
    use crate::core::engine::InterceptionEngine;
    use std::sync::Arc;

    #[test]
    fn test_log_interceptor_is_transparent() {
        let config = ProxyConfiguration::builder()
            .interceptor("log", crate::config::registry::factory(LogInterceptor::new))
            .build()
            .unwrap();
        let engine = InterceptionEngine::new(Arc::new(config));

        let site = MethodCallSite::builder("ClockService", "now")
            .trigger(Arc::new(LogTrigger::new(Level::DEBUG)))
            .build();

        let result = engine
            .invoke(&site, vec![], |_| Ok(Some(Value::new(11i64))))
            .unwrap()
            .unwrap();

        // Logging neither bypasses nor rewrites the result
        assert_eq!(result.downcast_ref::<i64>(), Some(&11));
    }

    #[test]
    fn test_level_defaults_to_info_without_log_trigger() {
        // A foreign trigger kind mapped to the log interceptor still works
        #[derive(Debug)]
        struct AuditTrigger;

        impl Trigger for AuditTrigger {
            fn kind(&self) -> &'static str {
                "audit"
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }

        let site = MethodCallSite::builder("ClockService", "now")
            .trigger(Arc::new(AuditTrigger))
            .build();

        let config = ProxyConfiguration::builder()
            .interceptor("audit", crate::config::registry::factory(LogInterceptor::new))
            .build()
            .unwrap();
        let engine = InterceptionEngine::new(Arc::new(config));

        assert!(engine.invoke(&site, vec![], |_| Ok(None)).is_ok());
    }
}
