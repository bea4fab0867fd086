//! Rolling-window state built from fetched snapshots.
//!
//! ## Submodules
//!
//! - [`buffer`]: Bounded FIFO series ([`SeriesBuffer`])
//! - [`state`]: The published [`DashboardState`]
//! - [`aggregate`]: Folding a fetch outcome into the state ([`apply`])
//! - [`duration`]: Parsing and formatting of duration strings (e.g., "60s", "10m")
//!
//! ## Data Flow
//!
//! ```text
//! FetchOutcome (Ok(RawSnapshot) | Err(FetchError))
//!        │
//!        ▼
//! apply(&state, &outcome, now)
//!        │
//!        ├──▶ per-series presence check
//!        │
//!        └──▶ SeriesBuffer::push (evicts the oldest point when full)
//! ```

pub mod aggregate;
pub mod buffer;
pub mod duration;
pub mod state;

pub use aggregate::apply;
pub use buffer::{Scalar, SeriesBuffer, SeriesPoint, DEFAULT_CAPACITY};
pub use state::{DashboardState, Series};
