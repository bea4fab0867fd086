//! # agentdash-types
//!
//! Wire schema for the telemetry snapshots served by the network agent.
//!
//! The agent publishes one JSON document per collection cycle:
//!
//! ```text
//! { "data": { "cpu_usage": 12.5, "memory_info": {...}, "network_info": {...},
//!             "disk_usage": {...}, "load_avg": [0.1, 0.2, 0.3],
//!             "hostname": "...", "ip_address": "..." },
//!   "hmac": "..." }
//! ```
//!
//! Every metric group inside `data` is optional. A group that is missing, or
//! has the wrong JSON type, decodes as `None`; a group that is present but
//! incomplete keeps the sub-fields it does have. Only the envelope itself
//! (an object holding a `data` object) is required.
//!
//! ## Features
//!
//! - `serde` (default): envelope decoding via `serde_json` and `Serialize`
//!   impls for every type
//!
//! ## Example
//!
//! ```rust
//! use agentdash_types::RawSnapshot;
//!
//! let snapshot = RawSnapshot::from_slice(br#"{
//!     "data": {
//!         "cpu_usage": 0,
//!         "network_info": { "bytes_sent": 100, "bytes_recv": 250 },
//!         "load_avg": [0.1, 0.2, 0.3, 0.4]
//!     }
//! }"#).unwrap();
//!
//! assert_eq!(snapshot.cpu_usage, Some(0.0));
//! assert!(snapshot.memory.is_none());
//! assert_eq!(snapshot.network.unwrap().total_traffic(), Some(350));
//! ```

#[cfg(feature = "serde")]
mod decode;
mod metrics;
mod snapshot;

#[cfg(feature = "serde")]
pub use decode::DecodeError;
pub use metrics::*;
pub use snapshot::*;
