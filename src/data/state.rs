//! Dashboard state published to renderers.

use agentdash_types::{HostIdentity, LoadTriple};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::buffer::{SeriesBuffer, DEFAULT_CAPACITY};

/// The five charted series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Series {
    Cpu,
    Memory,
    Network,
    Disk,
    Load,
}

impl Series {
    /// All series in display order.
    pub const ALL: [Series; 5] = [
        Series::Cpu,
        Series::Memory,
        Series::Network,
        Series::Disk,
        Series::Load,
    ];

    /// Chart title.
    pub fn label(&self) -> &'static str {
        match self {
            Series::Cpu => "CPU Usage",
            Series::Memory => "Memory Usage",
            Series::Network => "Network Traffic",
            Series::Disk => "Disk Usage",
            Series::Load => "Load Average",
        }
    }
}

/// Everything the renderers draw.
///
/// Each buffer evolves independently: a metric group missing from one
/// snapshot leaves its own buffer untouched and never affects the others.
/// Values are replaced wholesale by [`apply`](super::apply); renderers only
/// ever see shared, immutable snapshots of it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardState {
    /// CPU usage percentage.
    pub cpu: SeriesBuffer<f64>,
    /// Used memory in bytes.
    pub memory: SeriesBuffer<u64>,
    /// Total network traffic (sent + received) in bytes.
    pub network: SeriesBuffer<u64>,
    /// Used disk space in bytes.
    pub disk: SeriesBuffer<u64>,
    /// 1/5/15-minute load averages.
    pub load: SeriesBuffer<LoadTriple>,

    /// True until the first successful poll.
    pub loading: bool,
    /// Message of the most recent failed poll, cleared by the next success.
    pub error: Option<String>,

    /// Incremented on every applied outcome.
    pub revision: u64,
    pub last_success: Option<DateTime<Utc>>,
    pub consecutive_failures: u32,

    /// Latest reported host identity.
    pub host: Option<HostIdentity>,
    /// Latest reported memory size, used as the memory chart's ceiling.
    pub memory_total: Option<u64>,
    /// Latest reported disk size, used as the disk chart's ceiling.
    pub disk_total: Option<u64>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl DashboardState {
    /// Create the startup state: empty buffers, loading.
    pub fn new(capacity: usize) -> Self {
        Self {
            cpu: SeriesBuffer::new(capacity),
            memory: SeriesBuffer::new(capacity),
            network: SeriesBuffer::new(capacity),
            disk: SeriesBuffer::new(capacity),
            load: SeriesBuffer::new(capacity),
            loading: true,
            error: None,
            revision: 0,
            last_success: None,
            consecutive_failures: 0,
            host: None,
            memory_total: None,
            disk_total: None,
        }
    }

    /// Per-series capacity.
    pub fn capacity(&self) -> usize {
        self.cpu.capacity()
    }

    /// Time of the newest point across all series.
    pub fn latest_point_at(&self) -> Option<DateTime<Utc>> {
        [
            self.cpu.latest().map(|p| p.at),
            self.memory.latest().map(|p| p.at),
            self.network.latest().map(|p| p.at),
            self.disk.latest().map(|p| p.at),
            self.load.latest().map(|p| p.at),
        ]
        .into_iter()
        .flatten()
        .max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_empty_and_loading() {
        let state = DashboardState::new(60);
        assert!(state.loading);
        assert!(state.error.is_none());
        assert_eq!(state.revision, 0);
        assert_eq!(state.capacity(), 60);
        assert!(state.cpu.is_empty());
        assert!(state.memory.is_empty());
        assert!(state.network.is_empty());
        assert!(state.disk.is_empty());
        assert!(state.load.is_empty());
        assert!(state.latest_point_at().is_none());
    }

    #[test]
    fn test_default_uses_default_capacity() {
        assert_eq!(DashboardState::default().capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn test_serializes_for_export() {
        let state = DashboardState::new(5);
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["loading"], true);
        assert_eq!(value["cpu"]["capacity"], 5);
        assert!(value["cpu"]["points"].as_array().unwrap().is_empty());
    }
}
