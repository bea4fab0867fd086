use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default ceiling for exponential backoff.
pub const DEFAULT_MAX_INTERVAL: Duration = Duration::from_secs(600);

/// How the poll interval reacts to consecutive failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RetryStrategy {
    /// Keep polling at the configured interval.
    #[default]
    Fixed,
    /// Double the interval per consecutive failure.
    Exponential,
}

impl fmt::Display for RetryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryStrategy::Fixed => f.write_str("fixed"),
            RetryStrategy::Exponential => f.write_str("exponential"),
        }
    }
}

impl FromStr for RetryStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(RetryStrategy::Fixed),
            "exponential" => Ok(RetryStrategy::Exponential),
            other => Err(format!(
                "unknown retry policy {:?} (expected \"fixed\" or \"exponential\")",
                other
            )),
        }
    }
}

/// Delay schedule between polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryPolicy {
    #[default]
    Fixed,
    /// The interval doubles per consecutive failure up to `max_interval` and
    /// returns to the base interval after a success.
    Exponential { max_interval: Duration },
}

impl RetryPolicy {
    pub fn new(strategy: RetryStrategy, max_interval: Duration) -> Self {
        match strategy {
            RetryStrategy::Fixed => RetryPolicy::Fixed,
            RetryStrategy::Exponential => RetryPolicy::Exponential { max_interval },
        }
    }

    pub fn strategy(&self) -> RetryStrategy {
        match self {
            RetryPolicy::Fixed => RetryStrategy::Fixed,
            RetryPolicy::Exponential { .. } => RetryStrategy::Exponential,
        }
    }

    /// Delay before the next tick after `consecutive_failures` failed polls.
    pub fn delay(&self, interval: Duration, consecutive_failures: u32) -> Duration {
        match *self {
            RetryPolicy::Fixed => interval,
            RetryPolicy::Exponential { max_interval } => {
                let ceiling = max_interval.max(interval);
                2u32.checked_pow(consecutive_failures)
                    .and_then(|factor| interval.checked_mul(factor))
                    .map_or(ceiling, |d| d.min(ceiling))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_secs(60);

    #[test]
    fn test_fixed_never_changes() {
        let policy = RetryPolicy::Fixed;
        for failures in [0, 1, 5, 100] {
            assert_eq!(policy.delay(INTERVAL, failures), INTERVAL);
        }
    }

    #[test]
    fn test_exponential_doubles_up_to_ceiling() {
        let policy = RetryPolicy::Exponential {
            max_interval: Duration::from_secs(600),
        };
        assert_eq!(policy.delay(INTERVAL, 0), Duration::from_secs(60));
        assert_eq!(policy.delay(INTERVAL, 1), Duration::from_secs(120));
        assert_eq!(policy.delay(INTERVAL, 2), Duration::from_secs(240));
        assert_eq!(policy.delay(INTERVAL, 3), Duration::from_secs(480));
        assert_eq!(policy.delay(INTERVAL, 4), Duration::from_secs(600));
        assert_eq!(policy.delay(INTERVAL, u32::MAX), Duration::from_secs(600));
    }

    #[test]
    fn test_ceiling_below_interval_uses_interval() {
        let policy = RetryPolicy::Exponential {
            max_interval: Duration::from_secs(1),
        };
        assert_eq!(policy.delay(INTERVAL, 3), INTERVAL);
    }

    #[test]
    fn test_strategy_parses_case_insensitively() {
        assert_eq!("Fixed".parse::<RetryStrategy>(), Ok(RetryStrategy::Fixed));
        assert_eq!(
            "exponential".parse::<RetryStrategy>(),
            Ok(RetryStrategy::Exponential)
        );
        assert!("linear".parse::<RetryStrategy>().is_err());
    }

    #[test]
    fn test_policy_round_trips_strategy() {
        let policy = RetryPolicy::new(RetryStrategy::Exponential, DEFAULT_MAX_INTERVAL);
        assert_eq!(policy.strategy(), RetryStrategy::Exponential);
        assert_eq!(RetryPolicy::new(RetryStrategy::Fixed, DEFAULT_MAX_INTERVAL), RetryPolicy::Fixed);
    }
}
