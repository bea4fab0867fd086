//! Snapshot fetching.
//!
//! A [`SnapshotFetcher`] performs exactly one request per call and reports the
//! result as a [`FetchOutcome`]; it never panics or retries on its own. Two
//! implementations are provided:
//!
//! - [`HttpFetcher`]: `GET` against the agent's HTTP endpoint
//! - [`FileFetcher`]: reads the `latest.json` document the agent writes to disk

mod error;
mod file;
mod http;

pub use error::{FetchError, TransportError};
pub use file::FileFetcher;
pub use http::{HttpFetcher, HttpFetcherBuilder, DEFAULT_ENDPOINT};

use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use agentdash_types::RawSnapshot;
use async_trait::async_trait;

/// Result of a single poll.
pub type FetchOutcome = Result<RawSnapshot, FetchError>;

/// Source of telemetry snapshots.
///
/// Calls are independent of each other and may run concurrently.
///
/// # Example
///
/// ```no_run
/// use agentdash::{HttpFetcher, SnapshotFetcher};
///
/// # tokio_test::block_on(async {
/// let fetcher = HttpFetcher::builder()
///     .endpoint("http://localhost:8000/latest.json")
///     .build()
///     .unwrap();
///
/// match fetcher.fetch().await {
///     Ok(snapshot) => println!("cpu: {:?}", snapshot.cpu_usage),
///     Err(e) => eprintln!("poll failed: {e}"),
/// }
/// # });
/// ```
#[async_trait]
pub trait SnapshotFetcher: Send + Sync + Debug {
    /// Fetch and decode one snapshot.
    async fn fetch(&self) -> FetchOutcome;

    /// Human-readable description of the endpoint, shown in the status bar.
    fn description(&self) -> &str;
}

/// Pick a fetcher for the configured endpoint.
///
/// `http://` and `https://` endpoints use [`HttpFetcher`]; `file://` URLs and
/// bare paths use [`FileFetcher`]. Both honor `timeout`.
pub fn fetcher_for_endpoint(
    endpoint: &str,
    timeout: Duration,
) -> Result<Arc<dyn SnapshotFetcher>, FetchError> {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        let fetcher = HttpFetcher::builder()
            .endpoint(endpoint)
            .timeout(timeout)
            .build()?;
        return Ok(Arc::new(fetcher));
    }

    let path = endpoint.strip_prefix("file://").unwrap_or(endpoint);
    Ok(Arc::new(FileFetcher::new(PathBuf::from(path)).timeout(timeout)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_endpoints_use_http_fetcher() {
        let fetcher =
            fetcher_for_endpoint("http://localhost:8000/latest.json", Duration::from_secs(1))
                .unwrap();
        assert_eq!(fetcher.description(), "http: http://localhost:8000/latest.json");
    }

    #[test]
    fn test_file_urls_and_paths_use_file_fetcher() {
        let from_url =
            fetcher_for_endpoint("file:///var/lib/agent/latest.json", Duration::from_secs(1))
                .unwrap();
        assert_eq!(from_url.description(), "file: /var/lib/agent/latest.json");

        let from_path = fetcher_for_endpoint("latest.json", Duration::from_secs(1)).unwrap();
        assert_eq!(from_path.description(), "file: latest.json");
    }
}
