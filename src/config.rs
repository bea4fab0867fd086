//! Layered settings.
//!
//! Sources, lowest to highest precedence:
//!
//! 1. built-in defaults
//! 2. an optional TOML file (`--config`)
//! 3. environment variables prefixed with `AGENTDASH_` (nested keys use `__`,
//!    e.g. `AGENTDASH_RETRY__POLICY=exponential`)
//! 4. command-line flags
//!
//! ```toml
//! endpoint = "http://probe-01:8000/latest.json"
//! poll_interval = "30s"
//! capacity = 120
//! request_timeout = "5s"
//!
//! [retry]
//! policy = "exponential"
//! max_interval = "10m"
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use ::config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use thiserror::Error;

use crate::data::duration::{parse_duration, ParseDurationError};
use crate::data::DEFAULT_CAPACITY;
use crate::fetch::DEFAULT_ENDPOINT;
use crate::poll::{RetryPolicy, RetryStrategy, DEFAULT_MAX_INTERVAL};

const ENV_PREFIX: &str = "AGENTDASH";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("invalid {key}: {source}")]
    Duration {
        key: &'static str,
        #[source]
        source: ParseDurationError,
    },

    #[error("invalid retry.policy: {0}")]
    RetryPolicy(String),

    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: &'static str },
}

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub endpoint: String,
    pub poll_interval: Duration,
    pub capacity: usize,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            poll_interval: Duration::from_secs(60),
            capacity: DEFAULT_CAPACITY,
            request_timeout: Duration::from_secs(10),
            retry: RetryPolicy::Fixed,
        }
    }
}

/// Values given on the command line; `None` leaves lower layers in charge.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub poll_interval: Option<String>,
    pub capacity: Option<usize>,
    pub request_timeout: Option<String>,
    pub retry: Option<RetryStrategy>,
}

/// Shape of the merged configuration before durations are parsed.
#[derive(Debug, Deserialize)]
struct RawSettings {
    endpoint: String,
    poll_interval: String,
    capacity: i64,
    request_timeout: String,
    retry: RawRetry,
}

#[derive(Debug, Deserialize)]
struct RawRetry {
    policy: String,
    max_interval: String,
}

impl Settings {
    /// Merge all layers, reading the process environment.
    pub fn load(file: Option<&Path>, overrides: &Overrides) -> Result<Self, ConfigError> {
        Self::load_from(file, overrides, None)
    }

    /// Merge all layers with an explicit environment (`None` reads the process
    /// environment).
    pub fn load_from(
        file: Option<&Path>,
        overrides: &Overrides,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("endpoint", DEFAULT_ENDPOINT)?
            .set_default("poll_interval", "60s")?
            .set_default("capacity", DEFAULT_CAPACITY as i64)?
            .set_default("request_timeout", "10s")?
            .set_default("retry.policy", RetryStrategy::Fixed.to_string())?
            .set_default("retry.max_interval", "10m")?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .set_override_option("endpoint", overrides.endpoint.clone())?
            .set_override_option("poll_interval", overrides.poll_interval.clone())?
            .set_override_option("capacity", overrides.capacity.map(|c| c as i64))?
            .set_override_option("request_timeout", overrides.request_timeout.clone())?
            .set_override_option("retry.policy", overrides.retry.map(|r| r.to_string()))?
            .build()?;

        let raw: RawSettings = config.try_deserialize()?;
        let settings = Settings::try_from(raw)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the poller cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "endpoint",
                reason: "must not be empty",
            });
        }
        if self.capacity == 0 {
            return Err(ConfigError::Invalid {
                key: "capacity",
                reason: "must be at least 1",
            });
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::Invalid {
                key: "poll_interval",
                reason: "must be greater than zero",
            });
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                key: "request_timeout",
                reason: "must be greater than zero",
            });
        }
        Ok(())
    }
}

impl TryFrom<RawSettings> for Settings {
    type Error = ConfigError;

    fn try_from(raw: RawSettings) -> Result<Self, Self::Error> {
        let duration = |key: &'static str, value: &str| {
            parse_duration(value).map_err(|source| ConfigError::Duration { key, source })
        };

        let strategy: RetryStrategy = raw.retry.policy.parse().map_err(ConfigError::RetryPolicy)?;
        let max_interval = match strategy {
            RetryStrategy::Fixed => DEFAULT_MAX_INTERVAL,
            RetryStrategy::Exponential => duration("retry.max_interval", &raw.retry.max_interval)?,
        };

        let capacity = usize::try_from(raw.capacity).map_err(|_| ConfigError::Invalid {
            key: "capacity",
            reason: "must be at least 1",
        })?;

        Ok(Settings {
            endpoint: raw.endpoint.trim().to_string(),
            poll_interval: duration("poll_interval", &raw.poll_interval)?,
            capacity,
            request_timeout: duration("request_timeout", &raw.request_timeout)?,
            retry: RetryPolicy::new(strategy, max_interval),
        })
    }
}
