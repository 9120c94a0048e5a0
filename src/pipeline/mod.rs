// Concurrent monitoring pipeline: discovery -> supervisor -> pollers -> aggregator.
// Tasks communicate only over capacity-1 channels; cancellation is a root
// CancellationToken with one child token per tracked container.

pub mod aggregator;
pub mod discovery;
pub mod poller;
pub mod supervisor;

use crate::docker_repo::ContainerRuntime;
use crate::metrics::Metrics;
use std::sync::Arc;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

/// Shared collaborators for the pipeline tasks.
pub struct PipelineDeps {
    pub runtime: Arc<dyn ContainerRuntime>,
    pub metrics: Arc<Metrics>,
    pub root: CancellationToken,
}

pub struct PipelineConfig {
    pub discovery_interval: Duration,
    pub stats_interval: Duration,
}

/// Join handles for the three long-lived tasks. Pollers are spawned and
/// tracked by the supervisor, not surfaced here.
pub struct PipelineHandles {
    pub discovery: tokio::task::JoinHandle<()>,
    pub supervisor: tokio::task::JoinHandle<()>,
    pub aggregator: tokio::task::JoinHandle<()>,
}

impl PipelineHandles {
    /// Wait for the three long-lived tasks to finish (after root cancel).
    pub async fn join(self) {
        let _ = self.discovery.await;
        let _ = self.supervisor.await;
        let _ = self.aggregator.await;
    }
}

pub fn spawn(deps: PipelineDeps, config: PipelineConfig) -> PipelineHandles {
    let PipelineDeps {
        runtime,
        metrics,
        root,
    } = deps;

    // Capacity 1: an emission blocks until the previous one was consumed,
    // which backpressures discovery and the pollers naturally.
    let (containers_tx, containers_rx) = tokio::sync::mpsc::channel(1);
    let (stats_tx, stats_rx) = tokio::sync::mpsc::channel(1);

    let discovery = tokio::spawn(discovery::run(
        runtime.clone(),
        containers_tx,
        root.clone(),
        config.discovery_interval,
    ));
    let supervisor = tokio::spawn(supervisor::run(
        runtime,
        containers_rx,
        stats_tx,
        root.clone(),
        config.stats_interval,
    ));
    let aggregator = tokio::spawn(aggregator::run(stats_rx, metrics, root));

    PipelineHandles {
        discovery,
        supervisor,
        aggregator,
    }
}
