//! RawSnapshot - one decoded telemetry sample.

use crate::{DiskUsage, HostIdentity, LoadAverage, MemoryInfo, NetworkInfo};

/// One telemetry sample covering every metric group.
///
/// Each group is `None` when the agent did not report it (or reported it with
/// the wrong JSON type), which keeps "absent" distinguishable from "present
/// with a zero value".
///
/// # Example
///
/// ```rust
/// use agentdash_types::RawSnapshot;
///
/// let snapshot = RawSnapshot::builder()
///     .cpu_usage(12.5)
///     .network(100, 250)
///     .load_avg([0.5, 0.4, 0.3])
///     .build();
///
/// assert!(snapshot.disk.is_none());
/// assert_eq!(snapshot.network.unwrap().total_traffic(), Some(350));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RawSnapshot {
    /// CPU usage in percent.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub cpu_usage: Option<f64>,

    #[cfg_attr(
        feature = "serde",
        serde(rename = "memory_info", skip_serializing_if = "Option::is_none")
    )]
    pub memory: Option<MemoryInfo>,

    #[cfg_attr(
        feature = "serde",
        serde(rename = "network_info", skip_serializing_if = "Option::is_none")
    )]
    pub network: Option<NetworkInfo>,

    #[cfg_attr(
        feature = "serde",
        serde(rename = "disk_usage", skip_serializing_if = "Option::is_none")
    )]
    pub disk: Option<DiskUsage>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub load_avg: Option<LoadAverage>,

    /// Hostname and address, flattened into `data` on the wire.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub host: Option<HostIdentity>,
}

impl RawSnapshot {
    /// Create a builder for constructing snapshots.
    pub fn builder() -> RawSnapshotBuilder {
        RawSnapshotBuilder::default()
    }

    /// True when no metric group was reported at all.
    pub fn is_empty(&self) -> bool {
        self.cpu_usage.is_none()
            && self.memory.is_none()
            && self.network.is_none()
            && self.disk.is_none()
            && self.load_avg.is_none()
    }
}

/// Builder for [`RawSnapshot`], mostly useful in tests and demos.
#[derive(Debug, Default)]
pub struct RawSnapshotBuilder {
    snapshot: RawSnapshot,
}

impl RawSnapshotBuilder {
    pub fn cpu_usage(mut self, percent: f64) -> Self {
        self.snapshot.cpu_usage = Some(percent);
        self
    }

    /// Set the memory group with both `used` and `total`.
    pub fn memory(mut self, used: u64, total: u64) -> Self {
        self.snapshot.memory = Some(MemoryInfo {
            used: Some(used),
            total: Some(total),
            percent: None,
        });
        self
    }

    /// Set the memory group verbatim, including incomplete groups.
    pub fn memory_info(mut self, memory: MemoryInfo) -> Self {
        self.snapshot.memory = Some(memory);
        self
    }

    /// Set the network group with both counters.
    pub fn network(mut self, bytes_sent: u64, bytes_recv: u64) -> Self {
        self.snapshot.network = Some(NetworkInfo {
            bytes_sent: Some(bytes_sent),
            bytes_recv: Some(bytes_recv),
        });
        self
    }

    /// Set the network group verbatim, including incomplete groups.
    pub fn network_info(mut self, network: NetworkInfo) -> Self {
        self.snapshot.network = Some(network);
        self
    }

    pub fn disk(mut self, used: u64, total: u64) -> Self {
        self.snapshot.disk = Some(DiskUsage {
            used: Some(used),
            total: Some(total),
            ..DiskUsage::default()
        });
        self
    }

    pub fn disk_usage(mut self, disk: DiskUsage) -> Self {
        self.snapshot.disk = Some(disk);
        self
    }

    pub fn load_avg(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.snapshot.load_avg = Some(LoadAverage(values.into_iter().collect()));
        self
    }

    pub fn host(mut self, hostname: impl Into<String>, ip_address: impl Into<String>) -> Self {
        self.snapshot.host = Some(HostIdentity {
            hostname: Some(hostname.into()),
            ip_address: Some(ip_address.into()),
        });
        self
    }

    pub fn build(self) -> RawSnapshot {
        self.snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_snapshot_is_empty() {
        assert!(RawSnapshot::default().is_empty());
    }

    #[test]
    fn test_zero_cpu_is_not_empty() {
        let snapshot = RawSnapshot::builder().cpu_usage(0.0).build();
        assert!(!snapshot.is_empty());
        assert_eq!(snapshot.cpu_usage, Some(0.0));
    }

    #[test]
    fn test_builder_sets_groups() {
        let snapshot = RawSnapshot::builder()
            .memory(512, 1024)
            .disk(10, 100)
            .host("probe-01", "10.0.0.7")
            .build();

        assert_eq!(snapshot.memory.unwrap().used, Some(512));
        assert_eq!(snapshot.disk.unwrap().total, Some(100));
        assert_eq!(
            snapshot.host.unwrap().hostname.as_deref(),
            Some("probe-01")
        );
        assert!(snapshot.network.is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serializes_with_wire_names() {
        let snapshot = RawSnapshot::builder()
            .cpu_usage(5.0)
            .network(1, 2)
            .host("probe-01", "10.0.0.7")
            .build();

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["cpu_usage"], 5.0);
        assert_eq!(value["network_info"]["bytes_sent"], 1);
        assert_eq!(value["hostname"], "probe-01");
        assert!(value.get("memory_info").is_none());
    }
}
