//! Storage encoding for per-user setting values.
//!
//! Settings are persisted as text. Strings are written verbatim; any other
//! JSON value is written in serialized form. Reading parses the text as JSON
//! and falls back to the raw string, so objects, arrays, numbers and booleans
//! come back with their original shape.

use serde_json::Value;

/// Encode a setting value for storage.
#[must_use]
pub fn encode_setting_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Decode a stored setting value.
#[must_use]
pub fn decode_setting_value(stored: Option<&str>) -> Value {
    match stored {
        None => Value::Null,
        Some(raw) => {
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
        }
    }
}
