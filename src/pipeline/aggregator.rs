// Derives gauge values from raw stat snapshots

use crate::metrics::Metrics;
use crate::models::{DerivedMetrics, StatSnapshot};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Drains the shared snapshot channel until it closes (all senders gone)
/// or the root scope is cancelled, publishing derived values per snapshot.
pub async fn run(
    mut rx: mpsc::Receiver<StatSnapshot>,
    metrics: Arc<Metrics>,
    root: CancellationToken,
) {
    loop {
        let snapshot = tokio::select! {
            _ = root.cancelled() => {
                tracing::debug!("aggregator cancelled");
                return;
            }
            msg = rx.recv() => match msg {
                Some(s) => s,
                None => {
                    tracing::debug!("stats channel closed; aggregator stopping");
                    return;
                }
            }
        };

        // Zero-valued decode artifacts carry an empty ID; skip them.
        if snapshot.id.is_empty() {
            continue;
        }

        let derived = derive(&snapshot);
        metrics.set_container(&snapshot.id, &snapshot.name, &derived);
    }
}

pub fn derive(s: &StatSnapshot) -> DerivedMetrics {
    let (io_read_bytes, io_write_bytes) = io_bytes(s);
    DerivedMetrics {
        cpu_percent: cpu_percent(s),
        memory_percent: memory_percent(s),
        io_read_bytes,
        io_write_bytes,
    }
}

fn cpu_percent(s: &StatSnapshot) -> f64 {
    let cpu_delta = s.cpu.total_usage - s.precpu.total_usage;
    let system_delta = s.cpu.system_cpu_usage - s.precpu.system_cpu_usage;
    if system_delta == 0 {
        return 0.0;
    }
    (cpu_delta as f64 / system_delta as f64) * s.cpu.online_cpus as f64 * 100.0
}

fn memory_percent(s: &StatSnapshot) -> f64 {
    // No zero-limit guard: a zero limit yields inf/NaN, exactly as the
    // division reports it.
    s.memory.usage as f64 / s.memory.limit as f64 * 100.0
}

fn io_bytes(s: &StatSnapshot) -> (f64, f64) {
    let mut read = 0.0;
    let mut write = 0.0;
    // Across multiple devices the last matching entry wins; values are
    // not summed.
    for e in &s.blkio {
        if e.op == "read" {
            read = e.value as f64;
        } else if e.op == "write" {
            write = e.value as f64;
        }
    }
    (read, write)
}
