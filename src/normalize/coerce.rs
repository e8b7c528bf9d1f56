use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::database::models::JsonColumn;

/// Tolerant boolean coercion.
///
/// Accepts booleans, numbers (`0` is false, anything else true) and the
/// strings `true/1/yes` and `false/0/no` in any case. Everything else,
/// including the empty string, yields `fallback`.
pub fn parse_boolean(value: Option<&Value>, fallback: bool) -> bool {
    match value {
        None | Some(Value::Null) => fallback,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(fallback),
        Some(Value::String(s)) => parse_boolean_str(Some(s), fallback),
        Some(_) => fallback,
    }
}

/// Same as [`parse_boolean`] for raw query-string values.
pub fn parse_boolean_str(value: Option<&str>, fallback: bool) -> bool {
    let Some(raw) = value else { return fallback };
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => true,
        "false" | "0" | "no" => false,
        _ => fallback,
    }
}

/// Tolerant numeric coercion. Non-finite results fall back.
pub fn parse_number(value: Option<&Value>, fallback: f64) -> f64 {
    match value {
        None | Some(Value::Null) => fallback,
        Some(Value::Number(n)) => n.as_f64().filter(|f| f.is_finite()).unwrap_or(fallback),
        Some(Value::String(s)) => parse_number_str(Some(s), fallback),
        Some(_) => fallback,
    }
}

pub fn parse_number_str(value: Option<&str>, fallback: f64) -> f64 {
    let Some(raw) = value else { return fallback };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return fallback;
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => fallback,
    }
}

/// Decode a possibly string-encoded JSON value.
///
/// Strings are parsed as JSON; anything else is assumed to be decoded
/// already and returned as is. Missing, `null` and blank values produce
/// `fallback`. Malformed JSON is logged and also produces `fallback`.
pub fn parse_json_value(value: Option<&Value>, fallback: Value) -> Value {
    match value {
        None | Some(Value::Null) => fallback,
        Some(Value::String(s)) => decode_text(Some(s), fallback),
        Some(other) => other.clone(),
    }
}

/// Text-column flavour of [`parse_json_value`].
pub fn decode_text(value: Option<&str>, fallback: Value) -> Value {
    let Some(text) = value else { return fallback };
    if text.trim().is_empty() {
        return fallback;
    }
    match serde_json::from_str::<Value>(text) {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::warn!(error = %e, input = %truncate(text, 80), "failed to decode JSON column, using fallback");
            fallback
        }
    }
}

/// Decode into a concrete type, falling back when either the JSON or its
/// shape is wrong.
pub fn decode_as<T: DeserializeOwned>(value: Option<&Value>, fallback: T) -> T {
    let decoded = parse_json_value(value, Value::Null);
    if decoded.is_null() {
        return fallback;
    }
    match serde_json::from_value::<T>(decoded) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "decoded JSON column has unexpected shape, using fallback");
            fallback
        }
    }
}

/// [`parse_json_value`] for a row column, whichever way it is stored.
/// Native values pass through; text is decoded.
pub fn decode_column(column: Option<&JsonColumn>, fallback: Value) -> Value {
    match column {
        None => fallback,
        Some(JsonColumn::Text(text)) => decode_text(Some(text), fallback),
        Some(JsonColumn::Json(value)) => parse_json_value(Some(value), fallback),
    }
}

/// Serialize a structured value for storage in a text column.
///
/// Strings are stored verbatim so that plain localized text and values that
/// arrive pre-encoded are not double-quoted.
pub fn encode_json_column(value: Option<&Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
