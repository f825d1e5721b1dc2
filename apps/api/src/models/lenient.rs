//! Lenient readers for loosely-typed JSON.
//!
//! Request payloads and LLM replies are both hand-assembled JSON; a number where a
//! string was expected (or `null` where an array was expected) must degrade to a
//! default instead of rejecting the whole document.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Renders a scalar as text. Arrays join their scalar members with ", ".
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_to_string)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

/// Reads a list of strings. A lone string becomes a one-element list; `null` is empty.
pub fn value_to_strings(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(value_to_string)
            .filter(|s| !s.is_empty())
            .collect(),
        Value::Null => Vec::new(),
        other => {
            let s = value_to_string(other);
            if s.is_empty() {
                Vec::new()
            } else {
                vec![s]
            }
        }
    }
}

/// Reads a non-negative count. Numeric strings are accepted; anything else is zero.
pub fn value_to_count(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    }
}

/// First non-empty string among `keys` (aliases are checked in order).
pub fn field_string(obj: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .map(value_to_string)
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

/// First present count among `keys`.
pub fn field_count(obj: &Map<String, Value>, keys: &[&str]) -> u64 {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .map(value_to_count)
        .next()
        .unwrap_or(0)
}

/// Reads a JSON string only; every other type counts as absent.
pub fn value_to_text(value: &Value) -> String {
    value.as_str().map(str::trim).unwrap_or_default().to_string()
}

/// Reads string members of a list. A lone string becomes a one-element list;
/// non-string members and non-list values are dropped.
pub fn value_to_texts(value: &Value) -> Vec<String> {
    let items: &[Value] = match value {
        Value::Array(items) => items,
        Value::String(_) => std::slice::from_ref(value),
        _ => &[],
    };
    items
        .iter()
        .map(value_to_text)
        .filter(|s| !s.is_empty())
        .collect()
}

/// First non-empty JSON string among `keys`. Non-string values are skipped.
pub fn field_text(obj: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .map(value_to_text)
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_string(&Value::deserialize(deserializer)?))
}

pub fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = value_to_string(&Value::deserialize(deserializer)?);
    Ok((!s.is_empty()).then_some(s))
}

pub fn strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_strings(&Value::deserialize(deserializer)?))
}
