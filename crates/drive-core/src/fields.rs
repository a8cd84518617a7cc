//! Lookup and conversion helpers over the raw status document

use serde_json::{Map, Value};

use crate::error::{StateError, StateResult};

/// Get a key from an object, failing with [`StateError::MissingKey`]
pub(crate) fn get<'a>(obj: &'a Map<String, Value>, key: &str) -> StateResult<&'a Value> {
    obj.get(key)
        .ok_or_else(|| StateError::MissingKey(key.to_string()))
}

/// Interpret a value as an object
pub(crate) fn object<'a>(key: &str, value: &'a Value) -> StateResult<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| StateError::invalid_value(key, value))
}

/// Interpret a value as a string
pub(crate) fn string<'a>(key: &str, value: &'a Value) -> StateResult<&'a str> {
    value
        .as_str()
        .ok_or_else(|| StateError::invalid_value(key, value))
}

/// Interpret a value as a float. Numeric strings are accepted.
pub(crate) fn float(key: &str, value: &Value) -> StateResult<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| StateError::invalid_value(key, value))
}

/// Interpret a value as an integer. Fractional numbers are truncated,
/// strings must hold an integer literal.
pub(crate) fn integer(key: &str, value: &Value) -> StateResult<i64> {
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| StateError::invalid_value(key, value))
}

/// Parse a backend literal into one of the state enums
pub(crate) fn literal<T: std::str::FromStr>(key: &str, value: &Value) -> StateResult<T> {
    let s = string(key, value)?;
    s.parse().map_err(|_| StateError::invalid_value(key, s))
}
