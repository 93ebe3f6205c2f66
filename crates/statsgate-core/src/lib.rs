//! statsgate core: error types, host config loading, and the `STATSD` settings schema.
//!
//! This crate carries no network or runtime dependencies so the settings and
//! error surface can be shared by the provider and by host applications that
//! only need to validate config.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Bad config surfaces as `StatsGateError`/`Result`, never as a crash.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod config;
pub mod error;

/// Shared result type.
pub use error::{ErrorCode, Result, StatsGateError};
