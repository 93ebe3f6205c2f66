use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use statsgate_core::config::HostConfig;
use statsgate_core::error::Result;

use super::worker::WorkerContext;

/// Lifecycle hooks a container drives on each declared dependency.
pub trait DependencyProvider: Send + Sync {
    /// Called once when the provider is attached to a service under `name`.
    fn bind(&self, name: &str);

    fn setup(&self, _config: Arc<HostConfig>) -> Result<()> {
        Ok(())
    }

    fn stop(&self) {}

    /// Per-worker value; retrieved with [`WorkerContext::dependency`].
    fn inject(&self, worker: &WorkerContext) -> Arc<dyn Any + Send + Sync>;
}

/// A service's name plus its declared dependencies, in declaration order.
pub struct ServiceDefinition {
    name: String,
    deps: Vec<(String, Arc<dyn DependencyProvider>)>,
}

impl ServiceDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            deps: Vec::new(),
        }
    }

    /// Declare `provider` under attribute `attr` and bind it to that name.
    pub fn dependency(mut self, attr: &str, provider: impl DependencyProvider + 'static) -> Self {
        provider.bind(attr);
        if self.deps.iter().any(|(n, _)| n == attr) {
            tracing::warn!(service = %self.name, attr = %attr, "dependency redeclared, replacing");
            self.deps.retain(|(n, _)| n != attr);
        }
        self.deps.push((attr.to_string(), Arc::new(provider)));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dependency_names(&self) -> Vec<&str> {
        self.deps.iter().map(|(n, _)| n.as_str()).collect()
    }
}

/// Runs one service's dependency lifecycle.
pub struct ServiceContainer {
    service: String,
    config: Arc<HostConfig>,
    ordered: Vec<(String, Arc<dyn DependencyProvider>)>,
    providers: DashMap<String, Arc<dyn DependencyProvider>>,
    calls: AtomicU64,
}

impl ServiceContainer {
    /// Set up every provider. Returns the first setup error.
    pub fn start(definition: ServiceDefinition, config: HostConfig) -> Result<Self> {
        let config = Arc::new(config);
        let providers = DashMap::new();
        for (name, provider) in &definition.deps {
            provider.setup(Arc::clone(&config))?;
            providers.insert(name.clone(), Arc::clone(provider));
        }
        tracing::info!(service = %definition.name, dependencies = providers.len(), "service container started");

        Ok(Self {
            service: definition.name,
            config,
            ordered: definition.deps,
            providers,
            calls: AtomicU64::new(1),
        })
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn config(&self) -> Arc<HostConfig> {
        Arc::clone(&self.config)
    }

    /// Dependency names in declaration order.
    pub fn registered_dependencies(&self) -> Vec<String> {
        self.ordered.iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn provider(&self, name: &str) -> Option<Arc<dyn DependencyProvider>> {
        self.providers.get(name).map(|e| Arc::clone(e.value()))
    }

    /// New worker context for one entrypoint call, dependencies injected.
    pub fn worker(&self, entrypoint: &str) -> WorkerContext {
        let call_id = self.calls.fetch_add(1, Ordering::Relaxed);
        let mut ctx = WorkerContext::new(&self.service, entrypoint, call_id);
        for (name, provider) in &self.ordered {
            let dep = provider.inject(&ctx);
            ctx.insert(name.clone(), dep);
        }
        ctx
    }

    /// Stop providers in reverse declaration order.
    pub fn stop(&self) {
        for (_, provider) in self.ordered.iter().rev() {
            provider.stop();
        }
        tracing::info!(service = %self.service, "service container stopped");
    }
}
