//! Spy client/factory shared by provider tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use statsgate_core::config::{self, HostConfig, StatsdSettings};
use statsgate_core::{Result, StatsGateError};
use statsgate_provider::{ClientFactory, StatsClient};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Increment(String, i64, f64),
    Decrement(String, i64, f64),
    Gauge(String, f64, f64, bool),
    Set(String, String, f64),
    Timing(String, Duration, f64),
}

#[derive(Default)]
pub struct SpyClient {
    calls: Mutex<Vec<Call>>,
}

impl SpyClient {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn timings(&self, stat: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Timing(s, _, _) if s == stat))
            .count()
    }

    fn push(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl StatsClient for SpyClient {
    fn increment(&self, stat: &str, count: i64, rate: f64) {
        self.push(Call::Increment(stat.into(), count, rate));
    }

    fn decrement(&self, stat: &str, count: i64, rate: f64) {
        self.push(Call::Decrement(stat.into(), count, rate));
    }

    fn gauge(&self, stat: &str, value: f64, rate: f64, delta: bool) {
        self.push(Call::Gauge(stat.into(), value, rate, delta));
    }

    fn set(&self, stat: &str, value: &str, rate: f64) {
        self.push(Call::Set(stat.into(), value.into(), rate));
    }

    fn timing(&self, stat: &str, delta: Duration, rate: f64) {
        self.push(Call::Timing(stat.into(), delta, rate));
    }
}

/// Counts constructions and hands out one shared spy client.
#[derive(Default)]
pub struct SpyFactory {
    pub built: AtomicUsize,
    pub settings: Mutex<Vec<StatsdSettings>>,
    pub client: Arc<SpyClient>,
    pub build_delay: Option<Duration>,
    pub fail: bool,
}

impl SpyFactory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn built(&self) -> usize {
        self.built.load(Ordering::SeqCst)
    }

    pub fn built_with(&self) -> Vec<StatsdSettings> {
        self.settings.lock().unwrap().clone()
    }
}

impl ClientFactory for SpyFactory {
    fn build(&self, settings: &StatsdSettings) -> Result<Arc<dyn StatsClient>> {
        if let Some(d) = self.build_delay {
            std::thread::sleep(d);
        }
        if self.fail {
            return Err(StatsGateError::ClientConstruction("spy refused".into()));
        }
        self.built.fetch_add(1, Ordering::SeqCst);
        self.settings.lock().unwrap().push(settings.clone());
        let client: Arc<dyn StatsClient> = self.client.clone();
        Ok(client)
    }
}

pub fn host_config(enabled: bool) -> HostConfig {
    config::load_from_str(&format!(
        r#"
STATSD:
  prod1:
    host: "h"
    port: 8125
    prefix: "p"
    maxudpsize: 512
    enabled: {enabled}
"#
    ))
    .unwrap()
}
