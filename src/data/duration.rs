use std::time::Duration;

use thiserror::Error;

/// Suffix to nanoseconds multiplier (order matters: longer suffixes first)
const UNITS: &[(&str, f64)] = &[
    ("ns", 1.0),
    ("µs", 1_000.0),
    ("us", 1_000.0),
    ("ms", 1_000_000.0),
    ("s", 1_000_000_000.0),
    ("m", 60_000_000_000.0),
    ("h", 3_600_000_000_000.0),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseDurationError {
    #[error("unknown duration format: {0:?} (expected e.g. \"60s\", \"500ms\", \"10m\")")]
    UnknownFormat(String),

    #[error("invalid duration value: {0:?}")]
    InvalidValue(String),
}

/// Parse duration strings like "60s", "988.82ms", "16.958µs", "10m", "1h"
pub fn parse_duration(s: &str) -> Result<Duration, ParseDurationError> {
    let s = s.trim();

    for (suffix, multiplier) in UNITS {
        if let Some(val_str) = s.strip_suffix(suffix) {
            let val: f64 = val_str
                .trim()
                .parse()
                .map_err(|_| ParseDurationError::InvalidValue(s.to_string()))?;
            if !val.is_finite() || val < 0.0 {
                return Err(ParseDurationError::InvalidValue(s.to_string()));
            }
            return Ok(Duration::from_nanos((val * multiplier) as u64));
        }
    }

    Err(ParseDurationError::UnknownFormat(s.to_string()))
}

/// Format a duration for display
pub fn format_duration(d: Duration) -> String {
    let nanos = d.as_nanos();
    if nanos == 0 {
        "0s".to_string()
    } else if nanos < 1_000_000 {
        format!("{:.2}µs", nanos as f64 / 1_000.0)
    } else if nanos < 1_000_000_000 {
        format!("{:.0}ms", nanos as f64 / 1_000_000.0)
    } else if d.as_secs() < 60 {
        format!("{}s", d.as_secs())
    } else if d.as_secs() < 3600 {
        let (m, s) = (d.as_secs() / 60, d.as_secs() % 60);
        if s == 0 {
            format!("{}m", m)
        } else {
            format!("{}m{}s", m, s)
        }
    } else {
        let (h, m) = (d.as_secs() / 3600, (d.as_secs() % 3600) / 60);
        if m == 0 {
            format!("{}h", h)
        } else {
            format!("{}h{}m", h, m)
        }
    }
}

/// Format the age of an event for the status bar, e.g. "12s ago"
pub fn format_age(age: chrono::Duration) -> String {
    match age.to_std() {
        Ok(d) if d.as_secs() > 0 => format!("{} ago", format_duration(Duration::from_secs(d.as_secs()))),
        _ => "just now".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seconds() {
        let d = parse_duration("29.992671083s").unwrap();
        assert!((d.as_secs_f64() - 29.992671083).abs() < 0.0001);
    }

    #[test]
    fn test_parse_milliseconds() {
        let d = parse_duration("988.82775ms").unwrap();
        assert!((d.as_secs_f64() - 0.98882775).abs() < 0.0001);
    }

    #[test]
    fn test_parse_microseconds() {
        assert_eq!(parse_duration("16.958µs").unwrap().as_nanos(), 16958);
        assert_eq!(parse_duration("5us").unwrap().as_nanos(), 5000);
    }

    #[test]
    fn test_parse_minutes_and_hours() {
        assert_eq!(parse_duration("10m").unwrap(), Duration::from_secs(600));
        assert_eq!(parse_duration("1.5h").unwrap(), Duration::from_secs(5400));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_duration("60"),
            Err(ParseDurationError::UnknownFormat(_))
        ));
        assert!(matches!(
            parse_duration("fast s"),
            Err(ParseDurationError::InvalidValue(_))
        ));
        assert!(matches!(
            parse_duration("-5s"),
            Err(ParseDurationError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::ZERO), "0s");
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_secs(60)), "1m");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m30s");
        assert_eq!(format_duration(Duration::from_secs(7200)), "2h");
    }

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(chrono::Duration::seconds(12)), "12s ago");
        assert_eq!(format_age(chrono::Duration::zero()), "just now");
        // Clock skew
        assert_eq!(format_age(chrono::Duration::seconds(-3)), "just now");
    }
}
