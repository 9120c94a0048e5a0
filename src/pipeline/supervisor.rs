// Reconciles the discovered container set against running stat pollers

use crate::docker_repo::ContainerRuntime;
use crate::models::{ContainerSummary, StatSnapshot};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use super::poller;

/// Per-container supervisor state. An entry exists exactly while that
/// container's poller is running; cancelling the token stops the poller.
struct MonitorEntry {
    cancel: CancellationToken,
}

/// Set difference between tracked IDs and one freshly discovered set:
/// IDs to cancel (tracked but no longer present) and containers to start
/// polling (present but untracked, deduplicated by ID). IDs in both are
/// untouched.
pub(crate) fn diff<V>(
    tracked: &HashMap<String, V>,
    incoming: &[ContainerSummary],
) -> (Vec<String>, Vec<ContainerSummary>) {
    let incoming_ids: HashSet<&str> = incoming.iter().map(|c| c.id.as_str()).collect();

    let removed: Vec<String> = tracked
        .keys()
        .filter(|id| !incoming_ids.contains(id.as_str()))
        .cloned()
        .collect();

    let mut seen: HashSet<&str> = HashSet::new();
    let added: Vec<ContainerSummary> = incoming
        .iter()
        .filter(|c| !tracked.contains_key(&c.id) && seen.insert(c.id.as_str()))
        .cloned()
        .collect();

    (removed, added)
}

/// Owns the container -> poller map (single writer; no other task touches
/// it). Each received set is diffed freshly; removals are processed before
/// additions. On root cancellation the supervisor returns immediately and
/// the pollers observe the cascaded cancellation on their own. When the
/// discovery channel closes, existing pollers keep running on the stale
/// membership.
pub async fn run(
    runtime: Arc<dyn ContainerRuntime>,
    mut rx: mpsc::Receiver<Vec<ContainerSummary>>,
    stats_tx: mpsc::Sender<StatSnapshot>,
    root: CancellationToken,
    stats_interval: Duration,
) {
    let mut monitors: HashMap<String, MonitorEntry> = HashMap::new();

    loop {
        let containers = tokio::select! {
            _ = root.cancelled() => {
                tracing::debug!("supervisor cancelled");
                return;
            }
            set = rx.recv() => match set {
                Some(s) => s,
                None => {
                    tracing::warn!("discovery channel closed; container membership frozen");
                    return;
                }
            }
        };

        let (removed, added) = diff(&monitors, &containers);

        for id in removed {
            if let Some(entry) = monitors.remove(&id) {
                entry.cancel.cancel();
                tracing::info!(container = %id, "container removed");
            }
        }

        for summary in added {
            let cancel = root.child_token();
            tracing::info!(container = %summary.id, name = %summary.name, "container added");
            monitors.insert(
                summary.id.clone(),
                MonitorEntry {
                    cancel: cancel.clone(),
                },
            );
            tokio::spawn(poller::run(
                runtime.clone(),
                summary.id,
                cancel,
                root.clone(),
                stats_tx.clone(),
                stats_interval,
            ));
        }
    }
}
