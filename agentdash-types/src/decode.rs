//! Lenient envelope decoding.
//!
//! Only the envelope shape is enforced. Inside `data`, each group is read on
//! its own and anything structurally unexpected collapses to `None` for that
//! group or sub-field.

use std::str::FromStr;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::{DiskUsage, HostIdentity, LoadAverage, MemoryInfo, NetworkInfo, RawSnapshot};

/// The envelope could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The body is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(String),

    /// The top-level value is not an object.
    #[error("expected a JSON object at the top level, found {0}")]
    NotAnObject(&'static str),

    /// The envelope has no `data` member.
    #[error("envelope is missing the `data` object")]
    MissingData,

    /// `data` is present but is not an object.
    #[error("`data` must be an object, found {0}")]
    DataNotAnObject(&'static str),
}

impl RawSnapshot {
    /// Decode a snapshot from the raw bytes of an envelope document.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DecodeError> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| DecodeError::Json(e.to_string()))?;
        Self::from_envelope(&value)
    }

    /// Decode a snapshot from an already-parsed envelope.
    pub fn from_envelope(envelope: &Value) -> Result<Self, DecodeError> {
        let envelope = envelope
            .as_object()
            .ok_or_else(|| DecodeError::NotAnObject(kind(envelope)))?;
        let data = envelope.get("data").ok_or(DecodeError::MissingData)?;
        let data = data
            .as_object()
            .ok_or_else(|| DecodeError::DataNotAnObject(kind(data)))?;
        Ok(Self::from_data(data))
    }

    /// Build a snapshot from the members of the `data` object.
    ///
    /// Never fails: unknown members are ignored and malformed groups are
    /// treated as absent.
    pub fn from_data(data: &Map<String, Value>) -> Self {
        Self {
            cpu_usage: data.get("cpu_usage").and_then(number),
            memory: data.get("memory_info").and_then(memory_info),
            network: data.get("network_info").and_then(network_info),
            disk: data.get("disk_usage").and_then(disk_usage),
            load_avg: data.get("load_avg").and_then(load_avg),
            host: host_identity(data),
        }
    }
}

impl FromStr for RawSnapshot {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slice(s.as_bytes())
    }
}

fn memory_info(value: &Value) -> Option<MemoryInfo> {
    let fields = value.as_object()?;
    Some(MemoryInfo {
        used: fields.get("used").and_then(byte_count),
        total: fields.get("total").and_then(byte_count),
        percent: fields.get("percent").and_then(number),
    })
}

fn network_info(value: &Value) -> Option<NetworkInfo> {
    let fields = value.as_object()?;
    Some(NetworkInfo {
        bytes_sent: fields.get("bytes_sent").and_then(byte_count),
        bytes_recv: fields.get("bytes_recv").and_then(byte_count),
    })
}

fn disk_usage(value: &Value) -> Option<DiskUsage> {
    let fields = value.as_object()?;
    Some(DiskUsage {
        used: fields.get("used").and_then(byte_count),
        total: fields.get("total").and_then(byte_count),
        free: fields.get("free").and_then(byte_count),
        percent: fields.get("percent").and_then(number),
    })
}

fn load_avg(value: &Value) -> Option<LoadAverage> {
    let values = value.as_array()?;
    Some(LoadAverage(values.iter().map_while(number).collect()))
}

fn host_identity(data: &Map<String, Value>) -> Option<HostIdentity> {
    let hostname = data.get("hostname").and_then(Value::as_str).map(str::to_owned);
    let ip_address = data.get("ip_address").and_then(Value::as_str).map(str::to_owned);
    if hostname.is_none() && ip_address.is_none() {
        return None;
    }
    Some(HostIdentity {
        hostname,
        ip_address,
    })
}

/// A finite JSON number.
fn number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}

/// A non-negative integral JSON number (`100` and `100.0` both qualify).
fn byte_count(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    let f = number(value)?;
    (f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64).then_some(f as u64)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
