use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use statsgate_core::error::{Result, StatsGateError};

/// One entrypoint call's view of its service's dependencies.
pub struct WorkerContext {
    service: String,
    entrypoint: String,
    call_id: u64,
    deps: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl WorkerContext {
    pub fn new(service: &str, entrypoint: &str, call_id: u64) -> Self {
        Self {
            service: service.to_string(),
            entrypoint: entrypoint.to_string(),
            call_id,
            deps: HashMap::new(),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn entrypoint(&self) -> &str {
        &self.entrypoint
    }

    pub fn call_id(&self) -> u64 {
        self.call_id
    }

    pub(crate) fn insert(&mut self, name: String, dep: Arc<dyn Any + Send + Sync>) {
        self.deps.insert(name, dep);
    }

    /// Typed dependency injected under `name`.
    pub fn dependency<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>> {
        let dep = self
            .deps
            .get(name)
            .ok_or_else(|| StatsGateError::UnknownDependency(format!("{name} (not declared)")))?;
        Arc::clone(dep).downcast::<T>().map_err(|_| {
            StatsGateError::UnknownDependency(format!(
                "{name} is not a {}",
                std::any::type_name::<T>()
            ))
        })
    }
}
