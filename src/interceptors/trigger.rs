// src/interceptors/trigger.rs
//! Declarative trigger markers
//!
//! A trigger is the declarative marker placed on a method that activates an
//! interceptor (the generalization of an attribute/decorator). Triggers are
//! declared once on a [`MethodCallSite`](crate::core::call_site::MethodCallSite)
//! and matched to interceptors by their `kind` string; an interceptor can
//! downcast the trigger instance to read its declared parameters.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A declarative marker that activates an interceptor for a method
pub trait Trigger: Any + Send + Sync + fmt::Debug {
    /// Stable identifier used to look up the registered interceptor factory
    fn kind(&self) -> &'static str;

    /// Downcast support for interceptors reading trigger parameters
    fn as_any(&self) -> &dyn Any;
}

/// Shared trigger instance as stored on a call-site
pub type TriggerRef = Arc<dyn Trigger>;

/// Downcast a trigger to its concrete type
pub fn trigger_as<T: Trigger>(trigger: &dyn Trigger) -> Option<&T> {
    trigger.as_any().downcast_ref::<T>()
}
