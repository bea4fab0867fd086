//! File-based snapshot fetcher.
//!
//! The agent writes its latest snapshot to `latest.json` next to the
//! timestamped history files. This fetcher reads that document directly,
//! which is handy when the dashboard runs on the agent's host.

use std::path::{Path, PathBuf};
use std::time::Duration;

use agentdash_types::RawSnapshot;
use async_trait::async_trait;
use tracing::debug;

use super::{FetchOutcome, SnapshotFetcher, TransportError};

/// Reads snapshots from a JSON file on every call.
///
/// Unlike a change-watching source, every call re-reads the file: a snapshot
/// that has not changed is still a valid sample for this tick.
///
/// A read that does not finish within the timeout (a FIFO with no writer, a
/// hung network mount) fails with [`TransportError::Timeout`].
#[derive(Debug)]
pub struct FileFetcher {
    path: PathBuf,
    timeout: Duration,
    description: String,
}

impl FileFetcher {
    /// Create a new file fetcher for the given path with a 10 second timeout.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            timeout: Duration::from_secs(10),
            description,
        }
    }

    /// Set the read timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotFetcher for FileFetcher {
    async fn fetch(&self) -> FetchOutcome {
        let content = tokio::time::timeout(self.timeout, tokio::fs::read(&self.path))
            .await
            .map_err(|_| TransportError::Timeout)??;
        debug!(path = %self.path.display(), bytes = content.len(), "read snapshot file");
        Ok(RawSnapshot::from_slice(&content)?)
    }

    fn description(&self) -> &str {
        &self.description
    }
}
