// Periodic discovery of the running container set

use crate::docker_repo::ContainerRuntime;
use crate::models::ContainerSummary;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{Duration, interval};
use tokio_util::sync::CancellationToken;

/// Lists the running container set once per `every` (first listing happens
/// immediately) and sends the full set downstream. A listing error is fatal
/// to discovery: the task returns and the channel closes by drop, freezing
/// the supervisor's membership. Cancellation exits without a final emission.
pub async fn run(
    runtime: Arc<dyn ContainerRuntime>,
    tx: mpsc::Sender<Vec<ContainerSummary>>,
    cancel: CancellationToken,
    every: Duration,
) {
    let mut tick = interval(every);
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("discovery cancelled");
                return;
            }
            _ = tick.tick() => {}
        }

        let containers = match runtime.list_containers().await {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(error = %e, "container listing failed; discovery stopping");
                return;
            }
        };
        tracing::debug!(count = containers.len(), "scanned running containers");

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("discovery cancelled");
                return;
            }
            res = tx.send(containers) => {
                if res.is_err() {
                    // Supervisor is gone; nothing left to discover for.
                    return;
                }
            }
        }
    }
}
