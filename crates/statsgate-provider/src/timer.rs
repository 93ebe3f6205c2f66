//! Reusable timing wrapper for sync closures and futures.

use std::future::Future;
use std::sync::Arc;

use statsgate_core::error::Result;

use crate::client::{TimerOptions, TimerScope};
use crate::statsd::LazyClient;

/// A timer bound to a stat name, not to a client.
///
/// The client is resolved on each call, so a `Timed` can be created before
/// config exists and reused any number of times. When metrics are disabled
/// the wrapped code runs untimed. The sample is recorded on every exit path,
/// panics included.
#[derive(Clone)]
pub struct Timed {
    lazy: Arc<LazyClient>,
    stat: Arc<str>,
    options: TimerOptions,
}

impl Timed {
    pub(crate) fn new(lazy: Arc<LazyClient>, stat: String, options: TimerOptions) -> Self {
        Self {
            lazy,
            stat: stat.into(),
            options,
        }
    }

    pub fn stat(&self) -> &str {
        &self.stat
    }

    /// Run `f` inside a timed scope. `Err` only for configuration errors;
    /// `f`'s own result comes back untouched inside `Ok`.
    pub fn call<R>(&self, f: impl FnOnce() -> R) -> Result<R> {
        match self.lazy.gated()? {
            Some(client) => {
                let _scope = TimerScope::start(&**client, &self.stat, self.options);
                Ok(f())
            }
            None => Ok(f()),
        }
    }

    /// Wrap a one-argument function; use a tuple for several arguments.
    pub fn wrap<A, R, F>(&self, f: F) -> impl Fn(A) -> Result<R>
    where
        F: Fn(A) -> R,
    {
        let timed = self.clone();
        move |arg: A| timed.call(|| f(arg))
    }

    /// Time a future to completion (or to being dropped).
    pub async fn instrument<F: Future>(&self, fut: F) -> Result<F::Output> {
        match self.lazy.gated()? {
            Some(client) => {
                let _scope = TimerScope::start(&**client, &self.stat, self.options);
                Ok(fut.await)
            }
            None => Ok(fut.await),
        }
    }
}
