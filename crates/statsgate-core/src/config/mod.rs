//! Host config loader.
//!
//! The host owns the whole YAML document; this crate only ever reads the
//! `STATSD` section, and only decodes an alias block when a facade first needs it.

pub mod interpolate;
pub mod schema;

use std::fs;
use std::path::Path;

use serde_yaml::Value;

use crate::error::{Result, StatsGateError};

pub use schema::{HostConfig, Protocol, StatsdSettings, STATSD_SECTION};

pub fn load_from_file(path: impl AsRef<Path>) -> Result<HostConfig> {
    let path = path.as_ref();
    let s = fs::read_to_string(path)
        .map_err(|e| StatsGateError::Config(format!("read {} failed: {e}", path.display())))?;
    load_from_str(&s)
}

/// Parse a YAML document, expanding `${VAR}` / `${VAR:default}` from the process environment.
pub fn load_from_str(s: &str) -> Result<HostConfig> {
    load_from_str_with_env(s, |name| std::env::var(name).ok())
}

/// Same as [`load_from_str`] with an explicit variable lookup.
pub fn load_from_str_with_env<F>(s: &str, lookup: F) -> Result<HostConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut root: Value = serde_yaml::from_str(s)
        .map_err(|e| StatsGateError::Config(format!("invalid yaml: {e}")))?;
    interpolate::expand_value(&mut root, &lookup)?;

    match root {
        Value::Null => Ok(HostConfig::default()),
        Value::Mapping(m) => {
            let cfg = HostConfig::from_mapping(m);
            tracing::debug!(aliases = ?cfg.statsd_aliases(), "host config loaded");
            Ok(cfg)
        }
        _ => Err(StatsGateError::Config(
            "top-level config must be a mapping".into(),
        )),
    }
}
