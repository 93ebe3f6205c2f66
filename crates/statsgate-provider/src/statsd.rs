//! The lazy, `enabled`-gated StatsD dependency.
//!
//! `StatsD` is configuration-only: a config key, an optional name, and a
//! client factory. Nothing is read or built until a handle (or a [`Timed`]
//! wrapper) is first used. The `STATSD.<key>` block is resolved once; the
//! client is built once, and only when the block says `enabled: true` or the
//! caller explicitly asks for it through [`StatsHandle::client`].

use std::any::Any;
use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use once_cell::sync::OnceCell;

use statsgate_core::config::{HostConfig, StatsdSettings};
use statsgate_core::error::{Result, StatsGateError};

use crate::client::{ClientFactory, NetClientFactory, StatsClient, TimerOptions};
use crate::container::{DependencyProvider, WorkerContext};
use crate::timer::Timed;

/// Shared lazy state behind a `StatsD` and every handle/timer it hands out.
pub(crate) struct LazyClient {
    config_key: String,
    name: OnceCell<String>,
    factory: RwLock<Arc<dyn ClientFactory>>,
    config: OnceCell<Arc<HostConfig>>,
    settings: OnceCell<StatsdSettings>,
    client: OnceCell<Arc<dyn StatsClient>>,
}

impl LazyClient {
    fn name(&self) -> Option<&str> {
        self.name.get().map(String::as_str)
    }

    fn settings(&self) -> Result<&StatsdSettings> {
        let name = self.name().ok_or_else(|| StatsGateError::BindingAmbiguous {
            key: self.config_key.clone(),
        })?;

        self.settings.get_or_try_init(|| {
            let cfg = self.config.get().ok_or_else(|| StatsGateError::ConfigurationMissing {
                key: self.config_key.clone(),
            })?;
            let settings = cfg.statsd_settings(&self.config_key).map_err(|e| {
                tracing::warn!(key = %self.config_key, %name, code = e.code().as_str(), error = %e, "statsd config resolution failed");
                e
            })?;
            tracing::info!(
                key = %self.config_key,
                %name,
                enabled = settings.enabled,
                host = %settings.host,
                port = settings.port,
                "statsd settings resolved"
            );
            Ok(settings)
        })
    }

    /// Underlying client, built on first call. Ignores `enabled`.
    fn client(&self) -> Result<&Arc<dyn StatsClient>> {
        let settings = self.settings()?;
        self.client.get_or_try_init(|| {
            let factory = match self.factory.read() {
                Ok(f) => Arc::clone(&f),
                Err(poisoned) => Arc::clone(&poisoned.into_inner()),
            };
            let client = factory.build(settings)?;
            tracing::debug!(key = %self.config_key, protocol = ?settings.protocol, "statsd client constructed");
            Ok(client)
        })
    }

    /// `Some(client)` when enabled, `None` when the block disables metrics.
    pub(crate) fn gated(&self) -> Result<Option<&Arc<dyn StatsClient>>> {
        if self.settings()?.enabled {
            self.client().map(Some)
        } else {
            Ok(None)
        }
    }
}

/// Dependency provider for a lazily-built StatsD client.
///
/// Clones share the same lazy state, so a clone kept for [`StatsD::timer`]
/// sees the name bound by the service definition.
#[derive(Clone)]
pub struct StatsD {
    lazy: Arc<LazyClient>,
}

impl StatsD {
    /// Unnamed provider; the name is assigned when it is added to a service.
    pub fn new(config_key: impl Into<String>) -> Self {
        Self::build(config_key.into(), None, Arc::new(NetClientFactory))
    }

    pub fn with_name(config_key: impl Into<String>, name: impl Into<String>) -> Self {
        Self::build(config_key.into(), Some(name.into()), Arc::new(NetClientFactory))
    }

    /// Swap the client factory.
    ///
    /// The swap happens on the shared state, so clones, handles, and `Timed`
    /// values see it and any config from `setup` is kept. A client that was
    /// already built is not replaced.
    pub fn with_factory(self, factory: Arc<dyn ClientFactory>) -> Self {
        if self.lazy.client.get().is_some() {
            tracing::warn!(key = %self.lazy.config_key, "statsd client already built, new factory applies to nothing");
        }
        let mut slot = match self.lazy.factory.write() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        *slot = factory;
        drop(slot);
        self
    }

    fn build(config_key: String, name: Option<String>, factory: Arc<dyn ClientFactory>) -> Self {
        let name_cell = OnceCell::new();
        if let Some(n) = name {
            let _ = name_cell.set(n);
        }
        Self {
            lazy: Arc::new(LazyClient {
                config_key,
                name: name_cell,
                factory: RwLock::new(factory),
                config: OnceCell::new(),
                settings: OnceCell::new(),
                client: OnceCell::new(),
            }),
        }
    }

    pub fn config_key(&self) -> &str {
        &self.lazy.config_key
    }

    pub fn name(&self) -> Option<&str> {
        self.lazy.name()
    }

    /// Per-worker handle sharing this provider's lazy client.
    pub fn provide(&self, worker: &WorkerContext) -> StatsHandle {
        tracing::trace!(
            key = %self.lazy.config_key,
            service = %worker.service(),
            entrypoint = %worker.entrypoint(),
            "statsd handle provided"
        );
        StatsHandle {
            lazy: Arc::clone(&self.lazy),
        }
    }

    /// Timing wrapper usable before setup; resolution waits for the first call.
    pub fn timer(&self, stat: impl Into<String>) -> Timed {
        Timed::new(Arc::clone(&self.lazy), stat.into(), TimerOptions::default())
    }

    pub fn timer_with(&self, stat: impl Into<String>, options: TimerOptions) -> Timed {
        Timed::new(Arc::clone(&self.lazy), stat.into(), options)
    }
}

impl DependencyProvider for StatsD {
    fn bind(&self, name: &str) {
        if let Err(rejected) = self.lazy.name.set(name.to_string()) {
            if self.lazy.name() != Some(rejected.as_str()) {
                tracing::warn!(
                    key = %self.lazy.config_key,
                    bound = ?self.lazy.name(),
                    rejected = %rejected,
                    "statsd provider already bound, keeping first name"
                );
            }
        }
    }

    fn setup(&self, config: Arc<HostConfig>) -> Result<()> {
        if self.lazy.config.set(config).is_err() {
            tracing::warn!(key = %self.lazy.config_key, "statsd provider set up twice, keeping first config");
        }
        Ok(())
    }

    fn inject(&self, worker: &WorkerContext) -> Arc<dyn Any + Send + Sync> {
        Arc::new(self.provide(worker))
    }
}

/// What a worker sees: the enumerated StatsD operations, gated by `enabled`.
///
/// Every operation returns `Ok(())` once configuration resolved; errors are
/// configuration errors only and surface on first use.
#[derive(Clone)]
pub struct StatsHandle {
    lazy: Arc<LazyClient>,
}

impl fmt::Debug for StatsHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatsHandle")
            .field("key", &self.lazy.config_key)
            .field("name", &self.lazy.name())
            .field("resolved", &self.lazy.settings.get().is_some())
            .field("client_built", &self.lazy.client.get().is_some())
            .finish()
    }
}

impl StatsHandle {
    pub fn name(&self) -> Option<&str> {
        self.lazy.name()
    }

    pub fn is_enabled(&self) -> Result<bool> {
        Ok(self.lazy.settings()?.enabled)
    }

    pub fn incr(&self, stat: &str) -> Result<()> {
        self.incr_by(stat, 1, 1.0)
    }

    pub fn incr_by(&self, stat: &str, count: i64, rate: f64) -> Result<()> {
        if let Some(c) = self.lazy.gated()? {
            c.increment(stat, count, rate);
        }
        Ok(())
    }

    pub fn decr(&self, stat: &str) -> Result<()> {
        self.decr_by(stat, 1, 1.0)
    }

    pub fn decr_by(&self, stat: &str, count: i64, rate: f64) -> Result<()> {
        if let Some(c) = self.lazy.gated()? {
            c.decrement(stat, count, rate);
        }
        Ok(())
    }

    pub fn gauge(&self, stat: &str, value: f64) -> Result<()> {
        self.gauge_with(stat, value, 1.0, false)
    }

    pub fn gauge_with(&self, stat: &str, value: f64, rate: f64, delta: bool) -> Result<()> {
        if let Some(c) = self.lazy.gated()? {
            c.gauge(stat, value, rate, delta);
        }
        Ok(())
    }

    pub fn set(&self, stat: &str, value: &str) -> Result<()> {
        self.set_with(stat, value, 1.0)
    }

    pub fn set_with(&self, stat: &str, value: &str, rate: f64) -> Result<()> {
        if let Some(c) = self.lazy.gated()? {
            c.set(stat, value, rate);
        }
        Ok(())
    }

    pub fn timing(&self, stat: &str, delta: Duration) -> Result<()> {
        self.timing_with(stat, delta, 1.0)
    }

    pub fn timing_with(&self, stat: &str, delta: Duration, rate: f64) -> Result<()> {
        if let Some(c) = self.lazy.gated()? {
            c.timing(stat, delta, rate);
        }
        Ok(())
    }

    pub fn timer(&self, stat: impl Into<String>) -> Timed {
        Timed::new(Arc::clone(&self.lazy), stat.into(), TimerOptions::default())
    }

    pub fn timer_with(&self, stat: impl Into<String>, options: TimerOptions) -> Timed {
        Timed::new(Arc::clone(&self.lazy), stat.into(), options)
    }

    /// Raw underlying client.
    ///
    /// This bypasses `enabled`: the client is built and sends even when the
    /// block says `enabled: false`.
    pub fn client(&self) -> Result<Arc<dyn StatsClient>> {
        self.lazy.client().map(Arc::clone)
    }
}
