// src/interceptors/unit_of_work.rs
//! Unit-of-work interceptor
//!
//! Demonstrates an interceptor that mutates arguments rather than the
//! return value: if the designated argument slot holds an empty
//! [`UnitOfWorkHandle`], the before-hook creates a unit of work through the
//! injected factory and writes it into the slot; the after-hook commits it
//! when the trigger asks for that.

use crate::core::invocation::InvocationContext;
use crate::core::value::Value;
use crate::interceptors::trigger::Trigger;
use crate::interceptors::MethodInterceptor;
use crate::utils::errors::Result;
use anyhow::{anyhow, Context as _};
use std::any::Any;
use std::sync::Arc;
use tracing::debug;

/// A transactional scope the proxied method works inside
pub trait UnitOfWork: Send + Sync {
    /// Flush the pending changes
    fn commit(&self) -> anyhow::Result<()>;
}

/// Creates unit-of-work instances on demand
pub trait UnitOfWorkFactory: Send + Sync {
    fn create(&self) -> Arc<dyn UnitOfWork>;
}

/// Argument cell for a possibly-absent unit of work
#[derive(Clone, Default)]
pub struct UnitOfWorkHandle(Option<Arc<dyn UnitOfWork>>);

impl UnitOfWorkHandle {
    pub fn empty() -> Self {
        Self(None)
    }

    pub fn with(unit_of_work: Arc<dyn UnitOfWork>) -> Self {
        Self(Some(unit_of_work))
    }

    pub fn get(&self) -> Option<&Arc<dyn UnitOfWork>> {
        self.0.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

/// Declares unit-of-work management on a method
#[derive(Debug)]
pub struct UnitOfWorkTrigger {
    /// Argument position holding the [`UnitOfWorkHandle`]
    pub slot: usize,

    /// Commit the unit of work when the method completes
    pub commit: bool,
}

impl UnitOfWorkTrigger {
    pub fn new(slot: usize) -> Self {
        Self {
            slot,
            commit: false,
        }
    }

    pub fn committing(slot: usize) -> Self {
        Self { slot, commit: true }
    }
}

impl Trigger for UnitOfWorkTrigger {
    fn kind(&self) -> &'static str {
        "unit_of_work"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Fills the unit-of-work argument slot and commits on completion
pub struct UnitOfWorkInterceptor {
    factory: Arc<dyn UnitOfWorkFactory>,
}

impl UnitOfWorkInterceptor {
    pub fn new(factory: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { factory }
    }

    fn slot_of(context: &InvocationContext) -> anyhow::Result<usize> {
        context
            .trigger_as::<UnitOfWorkTrigger>()
            .map(|t| t.slot)
            .ok_or_else(|| anyhow!("unit_of_work interceptor run without its trigger"))
    }

    fn handle_at(context: &InvocationContext, slot: usize) -> anyhow::Result<UnitOfWorkHandle> {
        let value = context
            .argument(slot)
            .ok_or_else(|| anyhow!("argument slot {} is out of range", slot))?;
        value
            .downcast_ref::<UnitOfWorkHandle>()
            .cloned()
            .ok_or_else(|| anyhow!("argument slot {} does not hold a unit-of-work handle", slot))
    }
}

impl MethodInterceptor for UnitOfWorkInterceptor {
    fn before_invoke(&self, context: &InvocationContext) -> Result<()> {
        let slot = Self::slot_of(context)?;
        let handle = Self::handle_at(context, slot)?;

        // A caller-supplied unit of work is left in place
        if !handle.is_empty() {
            debug!(
                "{} already carries a unit of work in slot {}",
                context.call_site().identity(),
                slot
            );
            return Ok(());
        }

        let unit_of_work = self.factory.create();
        context.set_argument(slot, Value::new(UnitOfWorkHandle::with(unit_of_work)));
        debug!(
            "Created unit of work for {} in slot {}",
            context.call_site().identity(),
            slot
        );
        Ok(())
    }

    fn after_invoke(&self, context: &InvocationContext, _result: Option<&Value>) -> Result<()> {
        let commit = context
            .trigger_as::<UnitOfWorkTrigger>()
            .map(|t| t.commit)
            .unwrap_or(false);
        if !commit {
            return Ok(());
        }

        let slot = Self::slot_of(context)?;
        let handle = Self::handle_at(context, slot)?;

        if let Some(unit_of_work) = handle.get() {
            unit_of_work
                .commit()
                .context("unit of work commit failed")?;
            debug!("Committed unit of work for {}", context.call_site().identity());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::proxy_config::ProxyConfiguration;
    use crate::core::call_site::MethodCallSite;
    use crate::core::engine::InterceptionEngine;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockUnitOfWork {
        commits: Arc<AtomicUsize>,
    }

    impl UnitOfWork for MockUnitOfWork {
        fn commit(&self) -> anyhow::Result<()> {
            self.commits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct MockFactory {
        created: Arc<AtomicUsize>,
        commits: Arc<AtomicUsize>,
    }

    impl UnitOfWorkFactory for MockFactory {
        fn create(&self) -> Arc<dyn UnitOfWork> {
            self.created.fetch_add(1, Ordering::SeqCst);
            Arc::new(MockUnitOfWork {
                commits: Arc::clone(&self.commits),
            })
        }
    }

    struct Counters {
        created: Arc<AtomicUsize>,
        commits: Arc<AtomicUsize>,
    }

    fn uow_engine() -> (InterceptionEngine, Counters) {
        let created = Arc::new(AtomicUsize::new(0));
        let commits = Arc::new(AtomicUsize::new(0));
        let uow_factory = Arc::new(MockFactory {
            created: Arc::clone(&created),
            commits: Arc::clone(&commits),
        });

        let config = ProxyConfiguration::builder()
            .interceptor("unit_of_work", {
                let uow_factory = Arc::clone(&uow_factory);
                crate::config::registry::factory(move || {
                    UnitOfWorkInterceptor::new(uow_factory.clone() as Arc<dyn UnitOfWorkFactory>)
                })
            })
            .build()
            .unwrap();

        (
            InterceptionEngine::new(Arc::new(config)),
            Counters { created, commits },
        )
    }

    fn save_site(commit: bool) -> Arc<MethodCallSite> {
        let trigger = if commit {
            UnitOfWorkTrigger::committing(0)
        } else {
            UnitOfWorkTrigger::new(0)
        };
        MethodCallSite::builder("OrderRepository", "save")
            .trigger(Arc::new(trigger))
            .arity(1)
            .build()
    }

    #[test]
    fn test_empty_slot_is_filled_and_committed() {
        let (engine, counters) = uow_engine();

        engine
            .invoke(&save_site(true), vec![Value::new(UnitOfWorkHandle::empty())], |args| {
                // The real method sees the created unit of work
                let handle = args[0].downcast_ref::<UnitOfWorkHandle>().unwrap();
                assert!(!handle.is_empty());
                Ok(None)
            })
            .unwrap();

        assert_eq!(counters.created.load(Ordering::SeqCst), 1);
        assert_eq!(counters.commits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_preexisting_unit_of_work_is_kept_and_committed() {
        let (engine, counters) = uow_engine();

        let existing_commits = Arc::new(AtomicUsize::new(0));
        let existing: Arc<dyn UnitOfWork> = Arc::new(MockUnitOfWork {
            commits: Arc::clone(&existing_commits),
        });

        engine
            .invoke(
                &save_site(true),
                vec![Value::new(UnitOfWorkHandle::with(existing))],
                |_| Ok(None),
            )
            .unwrap();

        // Factory untouched; the caller's unit of work was committed
        assert_eq!(counters.created.load(Ordering::SeqCst), 0);
        assert_eq!(existing_commits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_no_commit_when_trigger_does_not_ask() {
        let (engine, counters) = uow_engine();

        engine
            .invoke(&save_site(false), vec![Value::new(UnitOfWorkHandle::empty())], |_| {
                Ok(None)
            })
            .unwrap();

        assert_eq!(counters.created.load(Ordering::SeqCst), 1);
        assert_eq!(counters.commits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_wrong_slot_type_fails_the_call() {
        let (engine, _counters) = uow_engine();

        let err = engine
            .invoke(&save_site(true), vec![Value::new(42i64)], |_| Ok(None))
            .unwrap_err();

        assert!(err.to_string().contains("unit_of_work"));
    }
}
