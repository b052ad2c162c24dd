// ABOUTME: Built-in filters that a configuration can opt into
// ABOUTME: Implements case, trim, length, json, base64 and time formatting transforms

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use tracing::warn;

use super::binding::coerce_to_text;
use super::error::Result;
use super::filters::FilterRegistry;

const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Uppercase filter - strings only, other values pass through
pub fn upper_filter(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.to_uppercase()),
        other => other.clone(),
    }
}

/// Lowercase filter - strings only, other values pass through
pub fn lower_filter(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.to_lowercase()),
        other => other.clone(),
    }
}

pub fn trim_filter(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.trim().to_string()),
        other => other.clone(),
    }
}

/// Length filter - character count of strings, element count of arrays and objects
pub fn length_filter(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::from(s.chars().count()),
        Value::Array(items) => Value::from(items.len()),
        Value::Object(map) => Value::from(map.len()),
        other => other.clone(),
    }
}

/// JSON filter - compact JSON text of any value
pub fn json_filter(value: &Value) -> Value {
    Value::String(value.to_string())
}

pub fn base64_encode_filter(value: &Value) -> Value {
    Value::String(BASE64.encode(coerce_to_text(value).as_bytes()))
}

/// Base64 decode filter - undecodable input passes through unchanged
pub fn base64_decode_filter(value: &Value) -> Value {
    let Value::String(input) = value else {
        return value.clone();
    };

    let decoded = BASE64
        .decode(input)
        .map_err(|e| e.to_string())
        .and_then(|bytes| String::from_utf8(bytes).map_err(|e| e.to_string()));

    match decoded {
        Ok(text) => Value::String(text),
        Err(e) => {
            warn!("base64_decode filter could not decode input: {}", e);
            value.clone()
        }
    }
}

/// Format time filter - accepts RFC 3339 strings or unix seconds
pub fn format_time_filter(value: &Value) -> Value {
    let datetime: Option<DateTime<Utc>> = match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                s.parse::<i64>()
                    .ok()
                    .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
            }),
        Value::Number(n) => n.as_i64().and_then(|ts| Utc.timestamp_opt(ts, 0).single()),
        _ => None,
    };

    match datetime {
        Some(dt) => Value::String(dt.format(DEFAULT_TIME_FORMAT).to_string()),
        None => {
            warn!("format_time filter could not parse timestamp: {}", value);
            value.clone()
        }
    }
}

/// Register all built-in filters with a registry
pub fn register_builtins(registry: &mut FilterRegistry) -> Result<()> {
    registry.register("upper", upper_filter)?;
    registry.register("lower", lower_filter)?;
    registry.register("trim", trim_filter)?;
    registry.register("length", length_filter)?;
    registry.register("json", json_filter)?;
    registry.register("base64_encode", base64_encode_filter)?;
    registry.register("base64_decode", base64_decode_filter)?;
    registry.register("format_time", format_time_filter)?;

    Ok(())
}
