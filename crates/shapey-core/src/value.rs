//! Value predicates and shallow mapping helpers
//!
//! Everything the engine decides about an input value goes through these
//! classifiers. Arrays are never mappings, even though both are "objects"
//! in the loose sense; only `Value::Object` is a plain mapping.

use serde_json::{Map, Value};

/// A plain key/value container (not an array, string or scalar)
pub fn is_plain_mapping(value: &Value) -> bool {
    matches!(value, Value::Object(_))
}

/// A mapping, array or string with nothing in it
pub fn is_empty_container(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Human-readable name of a value's runtime type
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Copy a mapping out of `value`, or an empty mapping for anything else
pub fn objectify(value: &Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    }
}

/// Shallow merge; keys from `overrides` win
pub fn merge(base: &Map<String, Value>, overrides: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = base.clone();
    for (key, value) in overrides {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Keep only the listed keys that are present in `map`
pub fn pick<'a, I>(map: &Map<String, Value>, keys: I) -> Map<String, Value>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut picked = Map::new();
    for key in keys {
        if let Some(value) = map.get(key) {
            picked.insert(key.to_string(), value.clone());
        }
    }
    picked
}

/// Drop the listed keys from a copy of `map`
pub fn omit<'a, I>(map: &Map<String, Value>, keys: I) -> Map<String, Value>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut remaining = map.clone();
    for key in keys {
        remaining.remove(key);
    }
    remaining
}
