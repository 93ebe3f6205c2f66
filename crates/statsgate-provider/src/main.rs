//! statsgate demo
//!
//! Loads a host config (default `statsgate.yaml`), starts a container for one
//! service with a `statsd` dependency, and emits a handful of metrics through
//! a worker. `RUST_LOG=statsgate_provider=debug` shows resolution and sends.

use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

use statsgate_core::{config, Result};
use statsgate_provider::{ServiceContainer, ServiceDefinition, StatsD, StatsHandle, TimerOptions};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "statsgate.yaml".to_string());
    if let Err(e) = run(&path).await {
        tracing::error!(code = e.code().as_str(), error = %e, "statsgate demo failed");
        std::process::exit(1);
    }
}

async fn run(path: &str) -> Result<()> {
    let cfg = config::load_from_file(path)?;

    let statsd = StatsD::new("prod1");
    let place_order = statsd.timer_with("orders.place", TimerOptions::with_rate(1.0));

    let definition = ServiceDefinition::new("orders").dependency("statsd", statsd);
    let container = ServiceContainer::start(definition, cfg)?;
    tracing::info!(service = %container.service(), %path, "statsgate demo starting");

    for n in 0..3u64 {
        let worker = container.worker("place_order");
        let stats = worker.dependency::<StatsHandle>("statsd")?;

        place_order
            .instrument(tokio::time::sleep(Duration::from_millis(5 * (n + 1))))
            .await?;
        stats.incr("orders.placed")?;
        stats.gauge("orders.in_flight", n as f64)?;
        stats.set("orders.customers", &format!("customer-{n}"))?;
        let enabled = stats.is_enabled()?;
        tracing::info!(call_id = worker.call_id(), enabled, "order handled");
    }

    container.stop();
    Ok(())
}
