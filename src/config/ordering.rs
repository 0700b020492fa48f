// src/config/ordering.rs
//! Interceptor ordering strategies
//!
//! Pure policies mapping the before-order of a call's contexts to an
//! after-order. Before-order is always declaration order; strategies only
//! decide how the after phase walks the same contexts.
//!
//! - [`PyramidOrdering`]: after = reverse of before (onion/LIFO nesting,
//!   the last interceptor to enter is the first to leave)
//! - [`SequentialOrdering`]: after = before (FIFO)

use crate::core::invocation::InvocationContext;

/// Policy producing the after-order from a call's before-ordered contexts
pub trait OrderingStrategy: Send + Sync {
    /// Order in which before-hooks run (identity in both bundled strategies)
    fn order_before<'a>(&self, contexts: &'a [InvocationContext]) -> Vec<&'a InvocationContext> {
        contexts.iter().collect()
    }

    /// Order in which after-hooks run
    fn order_after<'a>(&self, contexts: &'a [InvocationContext]) -> Vec<&'a InvocationContext>;
}

/// LIFO nesting: after-hooks run in reverse of before-order
#[derive(Debug, Default, Clone, Copy)]
pub struct PyramidOrdering;

impl OrderingStrategy for PyramidOrdering {
    fn order_after<'a>(&self, contexts: &'a [InvocationContext]) -> Vec<&'a InvocationContext> {
        contexts.iter().rev().collect()
    }
}

/// FIFO: after-hooks run in the same order as before-hooks
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialOrdering;

impl OrderingStrategy for SequentialOrdering {
    fn order_after<'a>(&self, contexts: &'a [InvocationContext]) -> Vec<&'a InvocationContext> {
        contexts.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::call_site::MethodCallSite;
    use crate::core::invocation::SharedCallState;
    use crate::core::value::Value;
    use crate::interceptors::trigger::Trigger;
    use crate::interceptors::MethodInterceptor;
    use crate::utils::errors::Result;
    use std::any::Any;
    use std::sync::Arc;

    #[derive(Debug)]
    struct NoopTrigger;

    impl Trigger for NoopTrigger {
        fn kind(&self) -> &'static str {
            "noop"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct NoopInterceptor;

    impl MethodInterceptor for NoopInterceptor {
        fn before_invoke(&self, _context: &InvocationContext) -> Result<()> {
            Ok(())
        }

        fn after_invoke(&self, _context: &InvocationContext, _result: Option<&Value>) -> Result<()> {
            Ok(())
        }
    }

    fn contexts(n: usize) -> Vec<InvocationContext> {
        let site = MethodCallSite::builder("TestService", "run").build();
        let state = SharedCallState::new(vec![]);
        (0..n)
            .map(|order| {
                InvocationContext::new(
                    Arc::clone(&site),
                    Arc::new(NoopTrigger),
                    Arc::new(NoopInterceptor),
                    state.clone(),
                    order,
                )
            })
            .collect()
    }

    #[test]
    fn test_pyramid_reverses_after_order() {
        let contexts = contexts(3);
        let strategy = PyramidOrdering;

        let before: Vec<_> = strategy.order_before(&contexts).iter().map(|c| c.order()).collect();
        let after: Vec<_> = strategy.order_after(&contexts).iter().map(|c| c.order()).collect();

        assert_eq!(before, vec![0, 1, 2]);
        assert_eq!(after, vec![2, 1, 0]);
    }

    #[test]
    fn test_sequential_keeps_after_order() {
        let contexts = contexts(3);
        let strategy = SequentialOrdering;

        let before: Vec<_> = strategy.order_before(&contexts).iter().map(|c| c.order()).collect();
        let after: Vec<_> = strategy.order_after(&contexts).iter().map(|c| c.order()).collect();

        assert_eq!(before, after);
    }

    #[test]
    fn test_strategies_handle_empty_input() {
        let contexts = contexts(0);
        assert!(PyramidOrdering.order_after(&contexts).is_empty());
        assert!(SequentialOrdering.order_after(&contexts).is_empty());
    }
}
