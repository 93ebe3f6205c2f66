#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use statsgate_core::config::{self, interpolate::expand_str};
use statsgate_core::ErrorCode;

fn env(name: &str) -> Option<String> {
    match name {
        "STATSD_HOST" => Some("metrics.internal".into()),
        "STATSD_PORT" => Some("9125".into()),
        "STATSD_ENABLED" => Some("false".into()),
        _ => None,
    }
}

#[test]
fn whole_value_placeholders_become_scalars() {
    let doc = r#"
STATSD:
  prod1:
    host: ${STATSD_HOST}
    port: ${STATSD_PORT:8125}
    maxudpsize: ${STATSD_MAXUDP:1024}
    enabled: ${STATSD_ENABLED:true}
"#;
    let cfg = config::load_from_str_with_env(doc, env).unwrap();
    let s = cfg.statsd_settings("prod1").unwrap();
    assert_eq!(s.host, "metrics.internal");
    assert_eq!(s.port, 9125);
    assert_eq!(s.maxudpsize, 1024);
    assert!(!s.enabled);
}

#[test]
fn embedded_placeholders_stay_strings() {
    let doc = "STATSD:\n  a:\n    prefix: \"svc.${STATSD_PORT}.x\"\n    enabled: true\n";
    let cfg = config::load_from_str_with_env(doc, env).unwrap();
    assert_eq!(cfg.statsd_settings("a").unwrap().prefix.as_deref(), Some("svc.9125.x"));
}

#[test]
fn unset_without_default_expands_empty() {
    assert_eq!(expand_str("a${NOPE}b", &env).unwrap(), "ab");
    assert_eq!(expand_str("${NOPE:}", &env).unwrap(), "");
    assert_eq!(expand_str("${NOPE:x:y}", &env).unwrap(), "x:y");
}

#[test]
fn empty_host_after_expansion_is_invalid() {
    let doc = "STATSD:\n  a:\n    host: ${NOPE}\n    enabled: true\n";
    let cfg = config::load_from_str_with_env(doc, env).unwrap();
    assert_eq!(cfg.statsd_settings("a").unwrap_err().code(), ErrorCode::ConfigurationInvalid);
}

#[test]
fn malformed_placeholders_fail_at_load() {
    assert_eq!(expand_str("${OPEN", &env).unwrap_err().code(), ErrorCode::Config);
    assert_eq!(expand_str("${:default}", &env).unwrap_err().code(), ErrorCode::Config);
    let err = config::load_from_str_with_env("A: ${BROKEN\n", env).unwrap_err();
    assert_eq!(err.code(), ErrorCode::Config);
}

#[test]
fn numeric_looking_strings_stay_strings() {
    let lookup = |name: &str| match name {
        "P" => Some("2024".to_string()),
        "H" => Some("10".to_string()),
        _ => None,
    };
    let doc = "STATSD:\n  prod1:\n    host: ${H}\n    prefix: ${P}\n    enabled: true\n";
    let cfg = config::load_from_str_with_env(doc, lookup).unwrap();
    let s = cfg.statsd_settings("prod1").unwrap();
    assert_eq!(s.host, "10");
    assert_eq!(s.prefix.as_deref(), Some("2024"));
}

#[test]
fn structured_values_for_string_fields_are_invalid() {
    let doc = "STATSD:\n  a:\n    host: [1, 2]\n    enabled: true\n  b:\n    prefix: { x: 1 }\n    enabled: true\n";
    let cfg = config::load_from_str(doc).unwrap();
    assert_eq!(cfg.statsd_settings("a").unwrap_err().code(), ErrorCode::ConfigurationInvalid);
    assert_eq!(cfg.statsd_settings("b").unwrap_err().code(), ErrorCode::ConfigurationInvalid);
}
