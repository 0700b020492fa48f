// src/interceptors/cache.rs
//! Return-value caching interceptor
//!
//! Before the real call, looks up a stored result; on a hit it overrides
//! the return value and requests bypass, so the second of two consecutive
//! calls never reaches the real method. After a real call, the working
//! return value is stored under the same key, honouring the expiry declared
//! on the trigger; a served hit is not re-stored, so the declared lifetime
//! counts from the original store.
//!
//! Keys combine the method identity with the content fingerprint of every
//! argument, so distinct-argument calls occupy distinct entries. A call
//! passing any argument without a fingerprint (built with `Value::new`
//! rather than `Value::hashed`) is not cached at all.

use crate::core::invocation::InvocationContext;
use crate::core::value::Value;
use crate::interceptors::trigger::Trigger;
use crate::interceptors::MethodInterceptor;
use crate::store::CacheStore;
use crate::utils::errors::Result;
use std::any::Any;
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Scratch key carrying the computed cache key from before to after
const SCRATCH_KEY: &str = "cache.key";

/// Scratch key marking that the before-hook was served from the store
const SCRATCH_HIT: &str = "cache.hit";

/// Declares caching on a method, with an optional entry lifetime
#[derive(Debug, Default)]
pub struct CacheTrigger {
    /// How long a stored entry stays live; `None` means no expiry
    pub expire_after: Option<Duration>,
}

impl CacheTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expiring(expire_after: Duration) -> Self {
        Self {
            expire_after: Some(expire_after),
        }
    }
}

impl Trigger for CacheTrigger {
    fn kind(&self) -> &'static str {
        "cache"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Caches method return values in a shared [`CacheStore`]
pub struct CacheInterceptor {
    store: Arc<dyn CacheStore>,
}

impl CacheInterceptor {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Cache key for this call: method identity plus argument fingerprints.
    ///
    /// `None` when any argument carries no fingerprint; such calls are
    /// never cached.
    fn cache_key(context: &InvocationContext) -> Option<String> {
        let mut key = context.call_site().identity();
        key.push('(');

        for position in 0..context.argument_count() {
            let fingerprint = context.argument(position)?.fingerprint()?;
            if position > 0 {
                key.push(',');
            }
            let _ = write!(key, "{:x}", fingerprint);
        }

        key.push(')');
        Some(key)
    }
}

impl MethodInterceptor for CacheInterceptor {
    fn before_invoke(&self, context: &InvocationContext) -> Result<()> {
        let key = match Self::cache_key(context) {
            Some(key) => key,
            None => {
                debug!(
                    "Arguments of {} carry no fingerprint; call is not cacheable",
                    context.call_site().identity()
                );
                return Ok(());
            }
        };

        if let Some(stored) = self.store.get(&key) {
            debug!("Cache hit for '{}'; bypassing target", key);
            context.override_return_value(stored);
            context.request_bypass();
            context.set_scratch(SCRATCH_HIT, Value::new(true));
        } else {
            debug!("Cache miss for '{}'", key);
        }

        // Hand the key to the after-hook so argument mutation by the real
        // method cannot shift the entry
        context.set_scratch(SCRATCH_KEY, Value::new(key));
        Ok(())
    }

    fn after_invoke(&self, context: &InvocationContext, result: Option<&Value>) -> Result<()> {
        // A served hit must not be re-stored: that would restart the entry's
        // lifetime and turn the declared expiry into a sliding one
        if context.scratch(SCRATCH_HIT).is_some() {
            return Ok(());
        }

        let key = match context.scratch(SCRATCH_KEY) {
            Some(key) => match key.downcast_ref::<String>() {
                Some(key) => key.clone(),
                None => return Ok(()),
            },
            // Uncacheable call
            None => return Ok(()),
        };

        if let Some(result) = result {
            let expire_after = context
                .trigger_as::<CacheTrigger>()
                .and_then(|t| t.expire_after);
            self.store.set(&key, result.clone(), expire_after);
            debug!("Stored result under '{}'", key);
        }

        Ok(())
    }
}
