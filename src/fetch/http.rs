//! HTTP snapshot fetcher.
//!
//! Issues a single `GET` against the agent's endpoint per call. Any non-2xx
//! status is a transport failure; the body is decoded leniently.

use std::time::Duration;

use agentdash_types::RawSnapshot;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{FetchError, FetchOutcome, SnapshotFetcher, TransportError};

/// Default endpoint served by the network agent.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/latest.json";

/// Fetches snapshots over HTTP.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    endpoint: String,
    description: String,
}

impl HttpFetcher {
    /// Create a new builder for configuring the fetcher.
    pub fn builder() -> HttpFetcherBuilder {
        HttpFetcherBuilder::default()
    }

    /// The URL being polled.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SnapshotFetcher for HttpFetcher {
    async fn fetch(&self) -> FetchOutcome {
        let response = self.client.get(&self.endpoint).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()).into());
        }

        let body = response.bytes().await?;
        debug!(endpoint = %self.endpoint, bytes = body.len(), "received snapshot body");

        Ok(RawSnapshot::from_slice(&body)?)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Builder for [`HttpFetcher`].
#[derive(Debug, Default)]
pub struct HttpFetcherBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl HttpFetcherBuilder {
    /// Set the snapshot URL (default: `http://localhost:8000/latest.json`).
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the fetcher.
    pub fn build(self) -> Result<HttpFetcher, FetchError> {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("agentdash/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let endpoint = self
            .endpoint
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        Ok(HttpFetcher {
            client,
            description: format!("http: {}", endpoint),
            endpoint,
        })
    }
}
