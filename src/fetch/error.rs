//! Error types for snapshot fetching.

use agentdash_types::DecodeError;
use thiserror::Error;

/// Why a poll produced no snapshot.
///
/// Both kinds are recoverable: the poller reports them and retries on the next
/// tick.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The endpoint could not be reached or answered with a failure status.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The endpoint answered, but the body is not a valid envelope.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

impl FetchError {
    /// True for network/status failures, false for malformed bodies.
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport(_))
    }
}

/// Network or status level failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection could not be established (refused, DNS, unreachable).
    #[error("connection failed: {0}")]
    Connection(String),

    /// No response within the configured request timeout.
    #[error("request timed out")]
    Timeout,

    /// The endpoint answered with a non-2xx status.
    #[error("endpoint returned HTTP {0}")]
    Status(u16),

    /// Reading a file-based snapshot failed.
    #[error("read failed: {0}")]
    Io(String),

    /// Any other request failure (invalid URL, body read interrupted, ...).
    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connection(err.to_string())
        } else if let Some(status) = err.status() {
            TransportError::Status(status.as_u16())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(err.into())
    }
}

impl From<std::io::Error> for FetchError {
    fn from(err: std::io::Error) -> Self {
        FetchError::Transport(TransportError::Io(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_failure_kind() {
        let err: FetchError = TransportError::Status(503).into();
        assert_eq!(err.to_string(), "transport error: endpoint returned HTTP 503");
        assert!(err.is_transport());

        let err: FetchError = DecodeError::MissingData.into();
        assert_eq!(
            err.to_string(),
            "decode error: envelope is missing the `data` object"
        );
        assert!(!err.is_transport());
    }

    #[test]
    fn test_io_errors_are_transport_failures() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = FetchError::from(io);
        assert!(matches!(err, FetchError::Transport(TransportError::Io(_))));
    }
}
