//! Shared error type across statsgate crates.

use thiserror::Error;

/// Stable error codes (safe to log or match on across versions).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// `STATSD` section or alias not present.
    ConfigurationMissing,
    /// Alias block present but malformed.
    ConfigurationInvalid,
    /// Facade used without an explicit or bound name.
    BindingAmbiguous,
    /// Underlying client could not be built.
    ClientConstruction,
    /// Host config file unreadable or not YAML.
    Config,
    /// Worker asked for a dependency that was never injected.
    UnknownDependency,
}

impl ErrorCode {
    /// String representation used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::ConfigurationMissing => "CONFIGURATION_MISSING",
            ErrorCode::ConfigurationInvalid => "CONFIGURATION_INVALID",
            ErrorCode::BindingAmbiguous => "BINDING_AMBIGUOUS",
            ErrorCode::ClientConstruction => "CLIENT_CONSTRUCTION",
            ErrorCode::Config => "CONFIG",
            ErrorCode::UnknownDependency => "UNKNOWN_DEPENDENCY",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, StatsGateError>;

/// Unified error type used by core and provider.
#[derive(Debug, Error)]
pub enum StatsGateError {
    #[error("configuration missing: STATSD.{key}")]
    ConfigurationMissing { key: String },
    #[error("configuration invalid: STATSD.{key}: {reason}")]
    ConfigurationInvalid { key: String, reason: String },
    #[error("statsd dependency for STATSD.{key} has no name (never bound to a service)")]
    BindingAmbiguous { key: String },
    #[error("client construction failed: {0}")]
    ClientConstruction(String),
    #[error("config: {0}")]
    Config(String),
    #[error("unknown dependency: {0}")]
    UnknownDependency(String),
}

impl StatsGateError {
    /// Map the error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            StatsGateError::ConfigurationMissing { .. } => ErrorCode::ConfigurationMissing,
            StatsGateError::ConfigurationInvalid { .. } => ErrorCode::ConfigurationInvalid,
            StatsGateError::BindingAmbiguous { .. } => ErrorCode::BindingAmbiguous,
            StatsGateError::ClientConstruction(_) => ErrorCode::ClientConstruction,
            StatsGateError::Config(_) => ErrorCode::Config,
            StatsGateError::UnknownDependency(_) => ErrorCode::UnknownDependency,
        }
    }

    pub(crate) fn invalid(key: &str, reason: impl Into<String>) -> Self {
        StatsGateError::ConfigurationInvalid {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}
