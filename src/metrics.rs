// Prometheus gauges for per-container usage, published under an explicit
// registry handed to the pipeline and the HTTP layer.

use crate::models::DerivedMetrics;
use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};

const METRIC_PREFIX: &str = "dsp_";

/// OS hostname for the constant `hostname` label, `"unknown"` when the
/// platform value is not valid UTF-8.
pub fn hostname() -> String {
    gethostname::gethostname()
        .into_string()
        .unwrap_or_else(|_| "unknown".to_string())
}

pub struct Metrics {
    registry: Registry,
    cpu_usage: GaugeVec,
    memory_usage: GaugeVec,
    io_usage: GaugeVec,
}

impl Metrics {
    pub fn new(hostname: &str) -> anyhow::Result<Self> {
        let cpu_usage = GaugeVec::new(
            Opts::new(
                format!("{METRIC_PREFIX}docker_cpu_percent_usage"),
                "Docker cpu usage from host machine",
            )
            .const_label("hostname", hostname),
            &["containerId", "containerName"],
        )?;
        let memory_usage = GaugeVec::new(
            Opts::new(
                format!("{METRIC_PREFIX}docker_memory_percent_usage"),
                "Docker memory usage from host machine",
            )
            .const_label("hostname", hostname),
            &["containerId", "containerName"],
        )?;
        let io_usage = GaugeVec::new(
            Opts::new(
                format!("{METRIC_PREFIX}docker_io_percent_usage"),
                "Docker IO usage from host machine",
            )
            .const_label("hostname", hostname),
            &["containerId", "containerName", "type"],
        )?;

        let registry = Registry::new();
        registry.register(Box::new(cpu_usage.clone()))?;
        registry.register(Box::new(memory_usage.clone()))?;
        registry.register(Box::new(io_usage.clone()))?;

        Ok(Self {
            registry,
            cpu_usage,
            memory_usage,
            io_usage,
        })
    }

    /// Write one container's derived values. Series are never removed;
    /// a container that stops being polled keeps its last value.
    pub fn set_container(&self, id: &str, name: &str, derived: &DerivedMetrics) {
        self.cpu_usage
            .with_label_values(&[id, name])
            .set(derived.cpu_percent);
        self.memory_usage
            .with_label_values(&[id, name])
            .set(derived.memory_percent);
        self.io_usage
            .with_label_values(&[id, name, "read"])
            .set(derived.io_read_bytes);
        self.io_usage
            .with_label_values(&[id, name, "write"])
            .set(derived.io_write_bytes);
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Text exposition of the current registry contents.
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let mut buf = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buf)?;
        Ok(String::from_utf8(buf)?)
    }
}
