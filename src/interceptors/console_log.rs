// src/interceptors/console_log.rs
//! Fixed-severity console logging interceptor
//!
//! Simplified variant of [`log`](crate::interceptors::log): the severity
//! and the sink (stdout) are fixed rather than trigger-declared.

use crate::core::invocation::InvocationContext;
use crate::core::value::Value;
use crate::interceptors::trigger::Trigger;
use crate::interceptors::MethodInterceptor;
use crate::utils::errors::Result;
use std::any::Any;

/// Declares fixed-severity console logging on a method
#[derive(Debug, Default)]
pub struct ConsoleLogTrigger;

impl Trigger for ConsoleLogTrigger {
    fn kind(&self) -> &'static str {
        "console_log"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Writes method entry/exit lines to stdout
#[derive(Default)]
pub struct ConsoleLogInterceptor;

impl ConsoleLogInterceptor {
    pub fn new() -> Self {
        Self
    }
}

impl MethodInterceptor for ConsoleLogInterceptor {
    fn before_invoke(&self, context: &InvocationContext) -> Result<()> {
        println!("ConsoleLog: method executing: {}", context.call_site().identity());
        Ok(())
    }

    fn after_invoke(&self, context: &InvocationContext, _result: Option<&Value>) -> Result<()> {
        println!("ConsoleLog: method executed: {}", context.call_site().identity());
        Ok(())
    }
}
