//! Polling schedule and ordering.
//!
//! - [`Poller`]: background task that fetches, aggregates, and publishes
//! - [`SequenceGate`]: keeps overlapping fetches from applying out of order
//! - [`RetryPolicy`]: stretches the interval while polls keep failing

mod policy;
mod poller;
mod sequence;

pub use policy::{RetryPolicy, RetryStrategy, DEFAULT_MAX_INTERVAL};
pub use poller::{Poller, PollerHandle};
pub use sequence::SequenceGate;
