//! # agentdash
//!
//! A terminal dashboard and library for watching the telemetry a network
//! agent publishes as JSON snapshots.
//!
//! The agent serves its latest snapshot (CPU, memory, network, disk, load
//! average) over HTTP. agentdash polls it on a fixed interval and keeps a
//! rolling window of the most recent points per metric, ready to be charted.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  ┌─────────┐   ┌────────┐   ┌───────────┐   ┌─────┐   ┌──────┐  │
//! │  │  fetch  │──▶│  poll  │──▶│   data    │──▶│ app │──▶│  ui  │  │
//! │  │ (input) │   │(ticks) │   │ (windows) │   │     │   │      │  │
//! │  └─────────┘   └────────┘   └───────────┘   └─────┘   └──────┘  │
//! │       ▲                                                          │
//! │       └── HttpFetcher | FileFetcher                              │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`fetch`]**: [`SnapshotFetcher`] trait with HTTP and file implementations
//! - **[`poll`]**: the [`Poller`] task, its ordering guard and retry policy
//! - **[`data`]**: bounded [`SeriesBuffer`]s, the [`DashboardState`] and [`apply`]
//! - **[`config`]**: layered [`Settings`]
//! - **[`app`]**, **[`events`]**, **[`ui`]**: the terminal dashboard
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Poll the agent on this machine every minute
//! agentdash
//!
//! # Poll a remote agent every 10 seconds, keeping two minutes of history
//! agentdash --endpoint http://probe-01:8000/latest.json --interval 10s --capacity 12
//!
//! # Take one sample and write it as JSON
//! agentdash --export state.json
//! ```
//!
//! ### As a library
//!
//! ```
//! use agentdash::{apply, DashboardState, RawSnapshot};
//! use chrono::Utc;
//!
//! let state = DashboardState::new(60);
//! let snapshot = RawSnapshot::builder().cpu_usage(12.5).network(100, 250).build();
//!
//! let next = apply(&state, &Ok(snapshot), Utc::now());
//! assert_eq!(next.cpu.len(), 1);
//! assert_eq!(next.network.latest().unwrap().value, 350);
//! assert!(next.memory.is_empty());
//! assert!(!next.loading);
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod fetch;
pub mod poll;
pub mod ui;

// Re-export main types for convenience
pub use agentdash_types::{LoadTriple, RawSnapshot};
pub use app::App;
pub use config::{ConfigError, Overrides, Settings};
pub use data::{apply, DashboardState, Series, SeriesBuffer, SeriesPoint};
pub use fetch::{
    fetcher_for_endpoint, FetchError, FetchOutcome, FileFetcher, HttpFetcher, SnapshotFetcher,
    TransportError,
};
pub use poll::{Poller, PollerHandle, RetryPolicy, RetryStrategy, SequenceGate};
