//! Metric groups carried inside a snapshot.

/// Memory block (`memory_info`).
///
/// Byte counters are optional individually: the group can be present while
/// one of its fields is missing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MemoryInfo {
    /// Bytes in use.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub used: Option<u64>,

    /// Total physical memory in bytes.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub total: Option<u64>,

    /// Usage percentage as reported by the agent.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub percent: Option<f64>,
}

/// Network counters block (`network_info`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NetworkInfo {
    /// Total bytes sent since boot.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub bytes_sent: Option<u64>,

    /// Total bytes received since boot.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub bytes_recv: Option<u64>,
}

impl NetworkInfo {
    /// Total traffic (`bytes_sent + bytes_recv`).
    ///
    /// Returns `None` unless both counters are present; a missing counter is
    /// never treated as zero.
    pub fn total_traffic(&self) -> Option<u64> {
        Some(self.bytes_sent?.saturating_add(self.bytes_recv?))
    }
}

/// Root filesystem usage block (`disk_usage`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DiskUsage {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub used: Option<u64>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub total: Option<u64>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub free: Option<u64>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub percent: Option<f64>,
}

/// Load averages as reported (`load_avg`).
///
/// Holds the leading numeric elements of the reported list; decoding stops at
/// the first element that is not a number.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct LoadAverage(pub Vec<f64>);

impl LoadAverage {
    /// The 1/5/15-minute triple, if at least three values were reported.
    ///
    /// Values past the third are ignored.
    pub fn triple(&self) -> Option<LoadTriple> {
        match self.0.as_slice() {
            [one, five, fifteen, ..] => Some(LoadTriple {
                one: *one,
                five: *five,
                fifteen: *fifteen,
            }),
            _ => None,
        }
    }
}

/// 1, 5 and 15 minute load averages.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LoadTriple {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

/// Identity of the host the agent runs on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HostIdentity {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub hostname: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub ip_address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_traffic_sums_both_counters() {
        let net = NetworkInfo {
            bytes_sent: Some(100),
            bytes_recv: Some(250),
        };
        assert_eq!(net.total_traffic(), Some(350));
    }

    #[test]
    fn test_total_traffic_requires_both_counters() {
        let sent_only = NetworkInfo {
            bytes_sent: Some(100),
            bytes_recv: None,
        };
        let recv_only = NetworkInfo {
            bytes_sent: None,
            bytes_recv: Some(250),
        };
        assert_eq!(sent_only.total_traffic(), None);
        assert_eq!(recv_only.total_traffic(), None);
    }

    #[test]
    fn test_total_traffic_saturates() {
        let net = NetworkInfo {
            bytes_sent: Some(u64::MAX),
            bytes_recv: Some(1),
        };
        assert_eq!(net.total_traffic(), Some(u64::MAX));
    }

    #[test]
    fn test_triple_ignores_extra_values() {
        let load = LoadAverage(vec![0.1, 0.2, 0.3, 0.4]);
        let triple = load.triple().unwrap();
        assert_eq!(triple.one, 0.1);
        assert_eq!(triple.five, 0.2);
        assert_eq!(triple.fifteen, 0.3);
    }

    #[test]
    fn test_triple_needs_three_values() {
        assert!(LoadAverage(vec![]).triple().is_none());
        assert!(LoadAverage(vec![1.0, 2.0]).triple().is_none());
    }
}
