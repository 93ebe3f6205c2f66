//! statsgate provider library entry.
//!
//! Wires the lazy `StatsD` dependency, its timing wrapper, the default
//! UDP/TCP clients, and a small dependency-injection container. Consumed by
//! the demo binary (`main.rs`) and by integration tests.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod client;
pub mod container;
pub mod statsd;
pub mod timer;

pub use client::{ClientFactory, NetClientFactory, StatsClient, TimerOptions, TimerScope};
pub use container::{DependencyProvider, ServiceContainer, ServiceDefinition, WorkerContext};
pub use statsd::{StatsD, StatsHandle};
pub use timer::Timed;
