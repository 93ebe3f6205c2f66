//! `${VAR}` / `${VAR:default}` expansion over string scalars.
//!
//! A value that is exactly one placeholder is re-read as a YAML scalar after
//! expansion, so `port: ${STATSD_PORT:8125}` yields a number, not a string.

use serde_yaml::Value;

use crate::error::{Result, StatsGateError};

pub(crate) fn expand_value<F>(value: &mut Value, lookup: &F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    match value {
        Value::String(s) if s.contains("${") => {
            let whole = is_single_placeholder(s);
            let expanded = expand_str(s, lookup)?;
            *value = if whole { rescalar(expanded) } else { Value::String(expanded) };
        }
        Value::Mapping(m) => {
            for (_, v) in m.iter_mut() {
                expand_value(v, lookup)?;
            }
        }
        Value::Sequence(items) => {
            for v in items.iter_mut() {
                expand_value(v, lookup)?;
            }
        }
        Value::Tagged(t) => expand_value(&mut t.value, lookup)?,
        _ => {}
    }
    Ok(())
}

/// Expand every placeholder in `s`. Unset variables without a default expand to "".
pub fn expand_str<F>(s: &str, lookup: &F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find('}')
            .ok_or_else(|| StatsGateError::Config(format!("unterminated placeholder in {s:?}")))?;
        let inner = &after[..end];

        let (name, default) = match inner.split_once(':') {
            Some((n, d)) => (n.trim(), Some(d)),
            None => (inner.trim(), None),
        };
        if name.is_empty() {
            return Err(StatsGateError::Config(format!("empty placeholder in {s:?}")));
        }

        match lookup(name) {
            Some(v) => out.push_str(&v),
            None => match default {
                Some(d) => out.push_str(d),
                None => tracing::warn!(var = %name, "config placeholder unset, expanding to empty"),
            },
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

fn is_single_placeholder(s: &str) -> bool {
    let t = s.trim();
    t.starts_with("${") && t.ends_with('}') && t.matches("${").count() == 1
}

fn rescalar(expanded: String) -> Value {
    if expanded.is_empty() {
        return Value::String(expanded);
    }
    match serde_yaml::from_str::<Value>(&expanded) {
        Ok(v @ (Value::Bool(_) | Value::Number(_) | Value::String(_))) => v,
        _ => Value::String(expanded),
    }
}
