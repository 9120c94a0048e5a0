// Domain models for container discovery and raw/derived stats

/// One running container as reported by a discovery cycle.
/// Identity is by `id`; `name` is display-only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerSummary {
    pub id: String,
    pub name: String,
}

/// CPU counters for one reading (cumulative nanoseconds).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuStats {
    pub total_usage: i64,
    pub usage_in_kernelmode: i64,
    pub usage_in_usermode: i64,
    pub system_cpu_usage: i64,
    pub online_cpus: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryStats {
    pub usage: u64,
    pub limit: u64,
}

/// One entry of the blkio `io_service_bytes_recursive` list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlkioEntry {
    pub major: i64,
    pub minor: i64,
    pub value: i64,
    pub op: String,
}

/// One point-in-time resource reading for a single container.
/// `precpu` is the prior cycle's CPU reading as reported by the same Docker
/// stats response; it is the delta basis for the CPU percentage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatSnapshot {
    pub id: String,
    pub name: String,
    pub cpu: CpuStats,
    pub precpu: CpuStats,
    pub memory: MemoryStats,
    pub blkio: Vec<BlkioEntry>,
}

/// Values computed from one snapshot and written straight to the registry.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DerivedMetrics {
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub io_read_bytes: f64,
    pub io_write_bytes: f64,
}
