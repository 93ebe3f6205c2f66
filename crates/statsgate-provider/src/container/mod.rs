//! Minimal dependency-injection container.
//!
//! A [`ServiceDefinition`] names its dependencies; a [`ServiceContainer`]
//! runs provider setup against the host config and builds a
//! [`WorkerContext`] per entrypoint call with every dependency injected.

pub mod service;
pub mod worker;

pub use service::{DependencyProvider, ServiceContainer, ServiceDefinition};
pub use worker::WorkerContext;
