// Per-container stat poll loop

use crate::docker_repo::ContainerRuntime;
use crate::models::StatSnapshot;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

/// One loop per tracked container: fetch a single stats reading every
/// `every`, send it on the shared channel. Stops silently when its own
/// scope is cancelled (container removed) and on root shutdown; it never
/// closes the shared channel — end-of-stream happens exactly once, when
/// the last sender clone drops. A fetch or decode error ends only this
/// poller, with no retry.
pub async fn run(
    runtime: Arc<dyn ContainerRuntime>,
    id: String,
    cancel: CancellationToken,
    root: CancellationToken,
    tx: mpsc::Sender<StatSnapshot>,
    every: Duration,
) {
    loop {
        if cancel.is_cancelled() {
            tracing::debug!(container = %id, "poller stopping, container removed");
            return;
        }
        if root.is_cancelled() {
            tracing::debug!(container = %id, "poller stopping on shutdown");
            return;
        }

        let snapshot = match runtime.fetch_stats(&id).await {
            Ok(s) => s,
            Err(e) => {
                tracing::debug!(container = %id, error = %e, "stats fetch failed; poller stopping");
                return;
            }
        };

        tokio::select! {
            _ = cancel.cancelled() => return,
            res = tx.send(snapshot) => {
                if res.is_err() {
                    // Aggregator is gone.
                    return;
                }
            }
        }

        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(every) => {}
        }
    }
}
