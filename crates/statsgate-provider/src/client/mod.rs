//! Underlying StatsD client: capability trait, scoped timer, and the default
//! UDP/TCP implementations.
//!
//! Everything here is fire-and-forget. Transport errors are logged at `debug`
//! and dropped; nothing in this module returns a send failure to callers.

pub mod line;
pub mod tcp;
pub mod udp;

use std::sync::Arc;
use std::time::{Duration, Instant};

use statsgate_core::config::{Protocol, StatsdSettings};
use statsgate_core::error::Result;

pub use line::LineClient;
pub use tcp::{TcpSink, TcpStatsClient};
pub use udp::{UdpSink, UdpStatsClient};

/// The fixed capability set a metrics backend must offer.
pub trait StatsClient: Send + Sync {
    fn increment(&self, stat: &str, count: i64, rate: f64);

    fn decrement(&self, stat: &str, count: i64, rate: f64) {
        self.increment(stat, count.saturating_neg(), rate);
    }

    fn gauge(&self, stat: &str, value: f64, rate: f64, delta: bool);

    fn set(&self, stat: &str, value: &str, rate: f64);

    fn timing(&self, stat: &str, delta: Duration, rate: f64);
}

impl dyn StatsClient {
    /// Start a scoped measurement; the sample is recorded when the guard drops.
    pub fn timer(&self, stat: &str, options: TimerOptions) -> TimerScope<'_> {
        TimerScope::start(self, stat, options)
    }
}

/// Options forwarded with every timer sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimerOptions {
    pub rate: f64,
}

impl Default for TimerOptions {
    fn default() -> Self {
        Self { rate: 1.0 }
    }
}

impl TimerOptions {
    pub fn with_rate(rate: f64) -> Self {
        Self { rate }
    }
}

/// Drop guard measuring wall time from `start` to `stop`/drop.
///
/// Records exactly once: on `stop`, or on drop (including unwinding).
pub struct TimerScope<'a> {
    client: &'a dyn StatsClient,
    stat: String,
    options: TimerOptions,
    start: Instant,
    recorded: bool,
}

impl<'a> TimerScope<'a> {
    pub fn start(client: &'a dyn StatsClient, stat: &str, options: TimerOptions) -> Self {
        Self {
            client,
            stat: stat.to_string(),
            options,
            start: Instant::now(),
            recorded: false,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Record now and return the measured duration.
    pub fn stop(mut self) -> Duration {
        self.record()
    }

    fn record(&mut self) -> Duration {
        let elapsed = self.start.elapsed();
        if !self.recorded {
            self.recorded = true;
            self.client.timing(&self.stat, elapsed, self.options.rate);
        }
        elapsed
    }
}

impl Drop for TimerScope<'_> {
    fn drop(&mut self) {
        self.record();
    }
}

/// Builds the underlying client from a resolved settings block.
pub trait ClientFactory: Send + Sync {
    fn build(&self, settings: &StatsdSettings) -> Result<Arc<dyn StatsClient>>;
}

/// Default factory: UDP or TCP per `settings.protocol`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NetClientFactory;

impl ClientFactory for NetClientFactory {
    fn build(&self, settings: &StatsdSettings) -> Result<Arc<dyn StatsClient>> {
        match settings.protocol {
            Protocol::Udp => Ok(Arc::new(UdpStatsClient::connect(settings)?)),
            Protocol::Tcp => Ok(Arc::new(TcpStatsClient::connect(settings))),
        }
    }
}
