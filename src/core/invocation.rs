// src/core/invocation.rs
//! Per-call invocation state
//!
//! For every intercepted call the engine builds one [`InvocationContext`]
//! per matched interceptor. All contexts of one call share a single
//! [`CallState`]: the mutable argument list, the scratch key→value store
//! used as a handoff channel between interceptors, the working return
//! value, and the bypass flag. The state is owned by the engine for the
//! duration of one call and discarded when the call completes; it is never
//! shared across calls.
//!
//! Hooks run one at a time, so the state lock is only ever contended with
//! itself and is never held across an await point.

use crate::core::call_site::MethodCallSite;
use crate::core::value::Value;
use crate::interceptors::trigger::{Trigger, TriggerRef};
use crate::interceptors::MethodInterceptor;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Mutable state shared by every context of one call
#[derive(Default)]
pub(crate) struct CallState {
    /// Argument list, readable by every phase of the call
    arguments: Vec<Value>,

    /// Cross-hook, same-call scratch data
    scratch: HashMap<String, Value>,

    /// Working return value (override slot before execution, result after)
    return_value: Option<Value>,

    /// Set once any context requests bypass; visible to all later phases
    bypass: bool,
}

/// Shared handle to one call's state
#[derive(Clone)]
pub(crate) struct SharedCallState(Arc<Mutex<CallState>>);

impl SharedCallState {
    pub(crate) fn new(arguments: Vec<Value>) -> Self {
        Self(Arc::new(Mutex::new(CallState {
            arguments,
            ..Default::default()
        })))
    }

    pub(crate) fn bypass_requested(&self) -> bool {
        self.0.lock().bypass
    }

    /// Snapshot of the argument list as mutated so far.
    ///
    /// The list itself stays in place so after-hooks can still read it
    /// once the real method has run.
    pub(crate) fn arguments(&self) -> Vec<Value> {
        self.0.lock().arguments.clone()
    }

    pub(crate) fn set_return_value(&self, value: Option<Value>) {
        self.0.lock().return_value = value;
    }

    pub(crate) fn return_value(&self) -> Option<Value> {
        self.0.lock().return_value.clone()
    }
}

/// Per-(call × interceptor) state container handed to interceptor hooks
pub struct InvocationContext {
    call_site: Arc<MethodCallSite>,
    trigger: TriggerRef,
    interceptor: Arc<dyn MethodInterceptor>,
    state: SharedCallState,
    order: usize,
}

impl InvocationContext {
    pub(crate) fn new(
        call_site: Arc<MethodCallSite>,
        trigger: TriggerRef,
        interceptor: Arc<dyn MethodInterceptor>,
        state: SharedCallState,
        order: usize,
    ) -> Self {
        Self {
            call_site,
            trigger,
            interceptor,
            state,
            order,
        }
    }

    /// The static description of the method being invoked
    pub fn call_site(&self) -> &MethodCallSite {
        &self.call_site
    }

    /// The trigger instance that matched this interceptor
    pub fn trigger(&self) -> &dyn Trigger {
        self.trigger.as_ref()
    }

    /// The trigger downcast to its concrete type
    pub fn trigger_as<T: Trigger>(&self) -> Option<&T> {
        self.trigger.as_any().downcast_ref::<T>()
    }

    /// Declaration-order position of this context among the call's contexts
    pub fn order(&self) -> usize {
        self.order
    }

    pub(crate) fn interceptor(&self) -> &Arc<dyn MethodInterceptor> {
        &self.interceptor
    }

    /// Value of the argument at `position`.
    ///
    /// Mutations made by before-hooks are only observed by the real method
    /// if written before the execute phase.
    pub fn argument(&self, position: usize) -> Option<Value> {
        self.state.0.lock().arguments.get(position).cloned()
    }

    /// Borrow the argument at `position` downcast to `T`, cloned out
    pub fn argument_as<T: Clone + 'static>(&self, position: usize) -> Option<T> {
        self.argument(position)
            .and_then(|v| v.downcast_ref::<T>().cloned())
    }

    /// Replace the argument at `position`; returns false if out of range
    pub fn set_argument(&self, position: usize, value: Value) -> bool {
        let mut state = self.state.0.lock();
        match state.arguments.get_mut(position) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Number of arguments in the call
    pub fn argument_count(&self) -> usize {
        self.state.0.lock().arguments.len()
    }

    /// Request that the real method be skipped for this call.
    ///
    /// Remaining before-hooks still run; only the execute phase is skipped.
    pub fn request_bypass(&self) {
        self.state.0.lock().bypass = true;
    }

    /// Whether any context of this call requested bypass
    pub fn bypass_requested(&self) -> bool {
        self.state.bypass_requested()
    }

    /// Overwrite the working return value (last writer wins)
    pub fn override_return_value(&self, value: Value) {
        self.state.0.lock().return_value = Some(value);
    }

    /// The current working return value
    pub fn return_value(&self) -> Option<Value> {
        self.state.return_value()
    }

    /// Read a scratch entry left by an earlier hook of the same call
    pub fn scratch(&self, key: &str) -> Option<Value> {
        self.state.0.lock().scratch.get(key).cloned()
    }

    /// Store a scratch entry visible to every later hook of the same call
    pub fn set_scratch(&self, key: impl Into<String>, value: Value) {
        self.state.0.lock().scratch.insert(key.into(), value);
    }
}
