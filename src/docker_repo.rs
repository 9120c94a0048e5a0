// Docker runtime access via bollard: container listing and one-shot stats

use crate::models::{BlkioEntry, ContainerSummary, CpuStats, MemoryStats, StatSnapshot};
use async_trait::async_trait;
use bollard::Docker;
use bollard::query_parameters::{ListContainersOptions, StatsOptions};
use bollard::models::{ContainerCpuStats, ContainerStatsResponse};
use futures_util::StreamExt;
use std::collections::HashMap;

/// Boundary to the container runtime. The pipeline only ever talks to this
/// trait, so tests can substitute a scripted runtime.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// List all currently running containers.
    async fn list_containers(&self) -> anyhow::Result<Vec<ContainerSummary>>;

    /// Fetch a single (non-streaming) stats reading for one container.
    async fn fetch_stats(&self, id: &str) -> anyhow::Result<StatSnapshot>;
}

pub struct DockerRepo {
    docker: Docker,
}

impl DockerRepo {
    pub fn connect() -> anyhow::Result<Self> {
        let docker = Docker::connect_with_unix_defaults()?;
        Ok(Self { docker })
    }
}

#[async_trait]
impl ContainerRuntime for DockerRepo {
    async fn list_containers(&self) -> anyhow::Result<Vec<ContainerSummary>> {
        let mut filters = HashMap::new();
        filters.insert("status".to_string(), vec!["running".to_string()]);

        let options = ListContainersOptions {
            all: false,
            filters: Some(filters),
            ..Default::default()
        };

        let containers = self.docker.list_containers(Some(options)).await?;
        let mut out = Vec::with_capacity(containers.len());
        for c in &containers {
            let id = c.id.as_ref().cloned().unwrap_or_default();
            let name = c
                .names
                .as_ref()
                .and_then(|n| n.first())
                .map(|n| n.trim_start_matches('/').to_string())
                .unwrap_or_else(|| id.clone());
            out.push(ContainerSummary { id, name });
        }
        Ok(out)
    }

    async fn fetch_stats(&self, id: &str) -> anyhow::Result<StatSnapshot> {
        let options = StatsOptions {
            stream: false,
            ..Default::default()
        };
        let mut stream = self.docker.stats(id, Some(options));
        let response = stream
            .next()
            .await
            .ok_or_else(|| anyhow::anyhow!("empty stats response for container {id}"))??;
        Ok(snapshot_from_response(&response, id))
    }
}

fn cpu_from_response(cpu: Option<&ContainerCpuStats>) -> CpuStats {
    let usage = cpu.and_then(|c| c.cpu_usage.as_ref());
    CpuStats {
        total_usage: usage.and_then(|u| u.total_usage).unwrap_or(0) as i64,
        usage_in_kernelmode: usage.and_then(|u| u.usage_in_kernelmode).unwrap_or(0) as i64,
        usage_in_usermode: usage.and_then(|u| u.usage_in_usermode).unwrap_or(0) as i64,
        system_cpu_usage: cpu.and_then(|c| c.system_cpu_usage).unwrap_or(0) as i64,
        online_cpus: cpu.and_then(|c| c.online_cpus).unwrap_or(0) as i64,
    }
}

/// Map a raw Docker stats response into our snapshot. Missing optional
/// fields become zero; an absent ID falls back to the requested one.
/// Exposed for unit tests.
pub(crate) fn snapshot_from_response(
    s: &ContainerStatsResponse,
    fallback_id: &str,
) -> StatSnapshot {
    let id = s
        .id
        .as_ref()
        .cloned()
        .unwrap_or_else(|| fallback_id.to_string());
    let name = s
        .name
        .as_ref()
        .map(|n| n.trim_start_matches('/').to_string())
        .unwrap_or_else(|| id.clone());

    let memory = MemoryStats {
        usage: s.memory_stats.as_ref().and_then(|m| m.usage).unwrap_or(0),
        limit: s.memory_stats.as_ref().and_then(|m| m.limit).unwrap_or(0),
    };

    let blkio = s
        .blkio_stats
        .as_ref()
        .and_then(|b| b.io_service_bytes_recursive.as_ref())
        .map(|entries| {
            entries
                .iter()
                .map(|e| BlkioEntry {
                    major: e.major.unwrap_or(0) as i64,
                    minor: e.minor.unwrap_or(0) as i64,
                    value: e.value.unwrap_or(0) as i64,
                    op: e.op.clone().unwrap_or_default(),
                })
                .collect()
        })
        .unwrap_or_default();

    StatSnapshot {
        id,
        name,
        cpu: cpu_from_response(s.cpu_stats.as_ref()),
        precpu: cpu_from_response(s.precpu_stats.as_ref()),
        memory,
        blkio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bollard::models::{
        ContainerBlkioStatEntry, ContainerBlkioStats, ContainerCpuStats, ContainerCpuUsage,
        ContainerMemoryStats, ContainerStatsResponse,
    };

    fn cpu_stats(total_usage: u64, system_cpu_usage: u64) -> ContainerCpuStats {
        ContainerCpuStats {
            cpu_usage: Some(ContainerCpuUsage {
                total_usage: Some(total_usage),
                ..Default::default()
            }),
            system_cpu_usage: Some(system_cpu_usage),
            online_cpus: Some(2),
            throttling_data: None,
        }
    }

    #[test]
    fn snapshot_maps_cpu_memory_and_blkio() {
        let s = ContainerStatsResponse {
            id: Some("abc123".to_string()),
            name: Some("/web".to_string()),
            cpu_stats: Some(cpu_stats(100_000_000, 1_000_000_000)),
            precpu_stats: Some(cpu_stats(50_000_000, 500_000_000)),
            memory_stats: Some(ContainerMemoryStats {
                usage: Some(512),
                limit: Some(1024),
                ..Default::default()
            }),
            blkio_stats: Some(ContainerBlkioStats {
                io_service_bytes_recursive: Some(vec![
                    ContainerBlkioStatEntry {
                        op: Some("read".to_string()),
                        value: Some(100),
                        ..Default::default()
                    },
                    ContainerBlkioStatEntry {
                        op: Some("write".to_string()),
                        value: Some(200),
                        ..Default::default()
                    },
                ]),
                ..Default::default()
            }),
            ..Default::default()
        };
        let out = snapshot_from_response(&s, "fallback");
        assert_eq!(out.id, "abc123");
        assert_eq!(out.name, "web");
        assert_eq!(out.cpu.total_usage, 100_000_000);
        assert_eq!(out.cpu.system_cpu_usage, 1_000_000_000);
        assert_eq!(out.cpu.online_cpus, 2);
        assert_eq!(out.precpu.total_usage, 50_000_000);
        assert_eq!(out.memory.usage, 512);
        assert_eq!(out.memory.limit, 1024);
        assert_eq!(out.blkio.len(), 2);
        assert_eq!(out.blkio[0].op, "read");
        assert_eq!(out.blkio[0].value, 100);
    }

    #[test]
    fn snapshot_defaults_missing_fields_to_zero() {
        let s = ContainerStatsResponse::default();
        let out = snapshot_from_response(&s, "c1");
        assert_eq!(out.id, "c1");
        assert_eq!(out.name, "c1");
        assert_eq!(out.cpu, CpuStats::default());
        assert_eq!(out.memory.limit, 0);
        assert!(out.blkio.is_empty());
    }

    #[test]
    fn snapshot_trims_leading_slash_from_name() {
        let s = ContainerStatsResponse {
            name: Some("/ghost".to_string()),
            ..Default::default()
        };
        let out = snapshot_from_response(&s, "deadbeef");
        assert_eq!(out.id, "deadbeef");
        assert_eq!(out.name, "ghost");
    }
}
