//! Window aggregation: folding one fetch outcome into the dashboard state.

use agentdash_types::RawSnapshot;
use chrono::{DateTime, Utc};

use super::state::DashboardState;
use crate::fetch::FetchOutcome;

/// Fold one outcome into `state`, returning the next state.
///
/// `state` itself is not modified. On failure the error slot is set and
/// nothing else changes except bookkeeping (`revision`,
/// `consecutive_failures`). On success each series is updated only when its
/// own group qualifies; a non-qualifying group leaves that series exactly as
/// it was.
pub fn apply(state: &DashboardState, outcome: &FetchOutcome, now: DateTime<Utc>) -> DashboardState {
    let mut next = state.clone();
    next.revision = state.revision.wrapping_add(1);

    match outcome {
        Err(e) => {
            next.error = Some(e.to_string());
            next.consecutive_failures = state.consecutive_failures.saturating_add(1);
        }
        Ok(snapshot) => {
            record_snapshot(&mut next, snapshot, now);
            next.error = None;
            next.loading = false;
            next.consecutive_failures = 0;
            next.last_success = Some(now);
        }
    }

    next
}

fn record_snapshot(state: &mut DashboardState, snapshot: &RawSnapshot, now: DateTime<Utc>) {
    if let Some(cpu) = snapshot.cpu_usage {
        state.cpu.push(now, cpu);
    }

    if let Some(memory) = &snapshot.memory {
        if let Some(used) = memory.used {
            state.memory.push(now, used);
        }
        if memory.total.is_some() {
            state.memory_total = memory.total;
        }
    }

    if let Some(traffic) = snapshot.network.and_then(|n| n.total_traffic()) {
        state.network.push(now, traffic);
    }

    if let Some(disk) = &snapshot.disk {
        if let Some(used) = disk.used {
            state.disk.push(now, used);
        }
        if disk.total.is_some() {
            state.disk_total = disk.total;
        }
    }

    if let Some(load) = snapshot.load_avg.as_ref().and_then(|l| l.triple()) {
        state.load.push(now, load);
    }

    if let Some(host) = &snapshot.host {
        state.host = Some(host.clone());
    }
}
