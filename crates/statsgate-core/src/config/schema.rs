use std::time::Duration;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_yaml::{Mapping, Value};

use crate::error::{Result, StatsGateError};

/// Top-level section holding one block per server alias.
pub const STATSD_SECTION: &str = "STATSD";

/// The host application's whole config document.
///
/// Blocks under `STATSD` stay raw until [`HostConfig::statsd_settings`] is
/// called, so a malformed alias only fails the facade that uses it.
#[derive(Debug, Clone, Default)]
pub struct HostConfig {
    root: Mapping,
}

impl HostConfig {
    pub fn from_mapping(root: Mapping) -> Self {
        Self { root }
    }

    /// Raw top-level section, if present.
    pub fn section(&self, name: &str) -> Option<&Value> {
        self.root.get(name)
    }

    /// Aliases declared under `STATSD`, in document order.
    pub fn statsd_aliases(&self) -> Vec<&str> {
        match self.section(STATSD_SECTION) {
            Some(Value::Mapping(m)) => m.keys().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Resolve and validate the block for `key`.
    pub fn statsd_settings(&self, key: &str) -> Result<StatsdSettings> {
        if key.is_empty() {
            return Err(StatsGateError::invalid(key, "config key must not be empty"));
        }

        let missing = || StatsGateError::ConfigurationMissing { key: key.to_string() };
        let block = match self.section(STATSD_SECTION) {
            None | Some(Value::Null) => return Err(missing()),
            Some(Value::Mapping(m)) => m.get(key).ok_or_else(missing)?,
            Some(_) => {
                return Err(StatsGateError::invalid(key, "STATSD section must be a mapping"))
            }
        };

        let settings: StatsdSettings = serde_yaml::from_value(block.clone())
            .map_err(|e| StatsGateError::invalid(key, e.to_string()))?;
        settings.validate(key)?;
        Ok(settings)
    }
}

/// Transport used by the underlying client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Udp,
    Tcp,
}

/// One `STATSD.<alias>` block.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatsdSettings {
    #[serde(default = "default_host", deserialize_with = "scalar_string")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default, deserialize_with = "opt_scalar_string")]
    pub prefix: Option<String>,

    #[serde(default = "default_maxudpsize")]
    pub maxudpsize: usize,

    pub enabled: bool,

    #[serde(default)]
    pub protocol: Protocol,

    #[serde(default)]
    pub ipv6: bool,

    /// Seconds; TCP connect/write timeout.
    #[serde(default)]
    pub timeout: Option<f64>,
}

impl StatsdSettings {
    pub fn validate(&self, key: &str) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(StatsGateError::invalid(key, "host must not be empty"));
        }
        if self.port == 0 {
            return Err(StatsGateError::invalid(key, "port must be between 1 and 65535"));
        }
        if self.maxudpsize == 0 {
            return Err(StatsGateError::invalid(key, "maxudpsize must be positive"));
        }
        if let Some(t) = self.timeout {
            if !(t.is_finite() && t > 0.0) {
                return Err(StatsGateError::invalid(key, "timeout must be a positive number of seconds"));
            }
        }
        Ok(())
    }

    pub fn timeout_duration(&self) -> Option<Duration> {
        self.timeout.and_then(|t| Duration::try_from_secs_f64(t).ok())
    }
}

/// String fields accept any scalar; `${VAR}` expansion may have turned `2024` into a number.
fn scalar_string<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    match Value::deserialize(d)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(D::Error::custom(format!("expected a string, got {other:?}"))),
    }
}

fn opt_scalar_string<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<String>, D::Error> {
    match Value::deserialize(d)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(D::Error::custom(format!("expected a string, got {other:?}"))),
    }
}

fn default_host() -> String {
    "localhost".into()
}
fn default_port() -> u16 {
    8125
}
fn default_maxudpsize() -> usize {
    512
}
