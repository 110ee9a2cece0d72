//! Built-in transforms for common operations
//!
//! These are the transforms a spec loaded from data can reference by name
//! through `{"$transform": "<name>", "args": [...]}`. They are plain
//! [`Transform`]s and work just as well in specs built in code.
//!
//! Copyright (c) 2025 Shapey Team
//! Licensed under the Apache-2.0 license

use crate::combine::combine;
use crate::error::{Error, Result, TransformError};
use crate::spec::Transform;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Builds a transform from the `args` of a `$transform` reference
pub type TransformFactory = Arc<dyn Fn(&[Value]) -> Result<Transform> + Send + Sync>;

/// Named transforms available to the spec loader
#[derive(Clone, Default)]
pub struct TransformRegistry {
    factories: HashMap<String, TransformFactory>,
}

impl TransformRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every transform in this module
    pub fn with_built_ins() -> Self {
        let mut registry = Self::new();
        registry.register_transform("identity", identity());
        registry.register_transform("upper", upper());
        registry.register_transform("lower", lower());
        registry.register_transform("trim", trim());
        registry.register_transform("length", length());
        registry.register_transform("sum", sum());
        registry.register_transform("keys", keys());
        registry.register_transform("values", values());
        registry.register_transform("to_string", to_string());
        registry.register_transform("to_number", to_number());
        registry.register_transform("is_null", is_null());

        registry.register("append", |args| Ok(append(string_arg("append", args, 0)?)));
        registry.register("prepend", |args| Ok(prepend(string_arg("prepend", args, 0)?)));
        registry.register("join", |args| Ok(join(string_arg("join", args, 0)?)));
        registry.register("get", |args| Ok(get(string_arg("get", args, 0)?)));
        registry.register("slice", |args| {
            let start = int_arg("slice", args, 0)?;
            let end = match args.get(1) {
                Some(_) => Some(int_arg("slice", args, 1)?),
                None => None,
            };
            Ok(slice(start, end))
        });
        registry.register("default", |args| Ok(default_value(any_arg("default", args, 0)?)));
        registry.register("constant", |args| Ok(constant(any_arg("constant", args, 0)?)));
        registry.register("pick", |args| {
            let keys = args
                .iter()
                .enumerate()
                .map(|(index, _)| string_arg("pick", args, index))
                .collect::<Result<Vec<_>>>()?;
            Ok(pick(keys))
        });
        registry
    }

    /// Register a parametric transform
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&[Value]) -> Result<Transform> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    /// Register a transform that takes no arguments
    pub fn register_transform(&mut self, name: impl Into<String>, transform: Transform) {
        self.register(name, move |_| Ok(transform.clone()));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build the named transform; `None` when the name is unknown
    pub fn build(&self, name: &str, args: &[Value]) -> Option<Result<Transform>> {
        self.factories.get(name).map(|factory| factory(args))
    }
}

impl fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformRegistry")
            .field("names", &self.names())
            .finish()
    }
}

fn any_arg(name: &str, args: &[Value], index: usize) -> Result<Value> {
    args.get(index)
        .cloned()
        .ok_or_else(|| Error::invalid_args(name, format!("missing argument {}", index)))
}

fn string_arg(name: &str, args: &[Value], index: usize) -> Result<String> {
    match args.get(index) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(Error::invalid_args(
            name,
            format!("argument {} must be a string, got {}", index, other),
        )),
        None => Err(Error::invalid_args(name, format!("missing argument {}", index))),
    }
}

fn int_arg(name: &str, args: &[Value], index: usize) -> Result<i64> {
    match args.get(index) {
        Some(value) => value.as_i64().ok_or_else(|| {
            Error::invalid_args(name, format!("argument {} must be an integer, got {}", index, value))
        }),
        None => Err(Error::invalid_args(name, format!("missing argument {}", index))),
    }
}

fn string_input<'a>(value: &'a Value) -> std::result::Result<&'a str, TransformError> {
    value
        .as_str()
        .ok_or_else(|| TransformError::type_mismatch("string", value))
}

/// Returns its input
pub fn identity() -> Transform {
    Transform::map(Value::clone).named("identity")
}

/// Upper-cases a string
pub fn upper() -> Transform {
    Transform::new(|v| Ok(json!(string_input(v)?.to_uppercase()))).named("upper")
}

/// Lower-cases a string
pub fn lower() -> Transform {
    Transform::new(|v| Ok(json!(string_input(v)?.to_lowercase()))).named("lower")
}

/// Trims surrounding whitespace from a string
pub fn trim() -> Transform {
    Transform::new(|v| Ok(json!(string_input(v)?.trim()))).named("trim")
}

/// Length of a string (in characters), array or mapping
pub fn length() -> Transform {
    Transform::new(|v| match v {
        Value::String(s) => Ok(json!(s.chars().count())),
        Value::Array(items) => Ok(json!(items.len())),
        Value::Object(map) => Ok(json!(map.len())),
        other => Err(TransformError::type_mismatch("string, array or object", other)),
    })
    .named("length")
}

/// Sum of an array of numbers
pub fn sum() -> Transform {
    Transform::new(|v| {
        let items = v
            .as_array()
            .ok_or_else(|| TransformError::type_mismatch("array", v))?;
        items.iter().try_fold(json!(0), |total, item| {
            if item.is_number() {
                Ok(combine(&total, item))
            } else {
                Err(TransformError::type_mismatch("number", item))
            }
        })
    })
    .named("sum")
}

/// Keys of a mapping
pub fn keys() -> Transform {
    Transform::new(|v| match v {
        Value::Object(map) => Ok(Value::Array(map.keys().cloned().map(Value::String).collect())),
        other => Err(TransformError::type_mismatch("object", other)),
    })
    .named("keys")
}

/// Values of a mapping
pub fn values() -> Transform {
    Transform::new(|v| match v {
        Value::Object(map) => Ok(Value::Array(map.values().cloned().collect())),
        other => Err(TransformError::type_mismatch("object", other)),
    })
    .named("values")
}

/// Renders a scalar as a string; containers are serialized as JSON
pub fn to_string() -> Transform {
    Transform::map(|v| match v {
        Value::String(s) => Value::String(s.clone()),
        Value::Null => Value::String(String::new()),
        other => Value::String(other.to_string()),
    })
    .named("to_string")
}

/// Parses a string as a number; numbers pass through
pub fn to_number() -> Transform {
    Transform::new(|v| match v {
        Value::Number(_) => Ok(v.clone()),
        Value::String(s) => {
            let text = s.trim();
            if let Ok(n) = text.parse::<i64>() {
                return Ok(json!(n));
            }
            text.parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| TransformError::failed(format!("cannot parse {:?} as a number", s)))
        }
        other => Err(TransformError::type_mismatch("number or string", other)),
    })
    .named("to_number")
}

/// Whether the input is null
pub fn is_null() -> Transform {
    Transform::map(|v| Value::Bool(v.is_null())).named("is_null")
}

/// Appends a suffix to a string
pub fn append(suffix: String) -> Transform {
    Transform::new(move |v| Ok(json!(format!("{}{}", string_input(v)?, suffix)))).named("append")
}

/// Prepends a prefix to a string
pub fn prepend(prefix: String) -> Transform {
    Transform::new(move |v| Ok(json!(format!("{}{}", prefix, string_input(v)?)))).named("prepend")
}

/// Joins array items with a separator; non-string items are rendered as JSON
pub fn join(separator: String) -> Transform {
    Transform::new(move |v| {
        let items = v
            .as_array()
            .ok_or_else(|| TransformError::type_mismatch("array", v))?;
        let parts: Vec<String> = items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();
        Ok(json!(parts.join(&separator)))
    })
    .named("join")
}

/// Value under `key`, or null
pub fn get(key: String) -> Transform {
    Transform::map(move |v| v.get(&key).cloned().unwrap_or(Value::Null)).named("get")
}

/// Only the listed keys of a mapping; non-mappings give an empty mapping
pub fn pick(keys: Vec<String>) -> Transform {
    Transform::map(move |v| {
        let map = crate::value::objectify(v);
        Value::Object(crate::value::pick(&map, keys.iter().map(String::as_str)))
    })
    .named("pick")
}

/// Replaces null with `fallback`
pub fn default_value(fallback: Value) -> Transform {
    Transform::map(move |v| if v.is_null() { fallback.clone() } else { v.clone() }).named("default")
}

/// Ignores its input
pub fn constant(value: Value) -> Transform {
    Transform::constant(value).named("constant")
}

/// Sub-range of a string (by character) or array
///
/// Negative bounds count from the end; `end` defaults to the length.
pub fn slice(start: i64, end: Option<i64>) -> Transform {
    Transform::new(move |v| match v {
        Value::String(s) => {
            let chars: Vec<char> = s.chars().collect();
            let (from, to) = bounds(chars.len(), start, end);
            Ok(json!(chars[from..to].iter().collect::<String>()))
        }
        Value::Array(items) => {
            let (from, to) = bounds(items.len(), start, end);
            Ok(Value::Array(items[from..to].to_vec()))
        }
        other => Err(TransformError::type_mismatch("string or array", other)),
    })
    .named("slice")
}

fn bounds(len: usize, start: i64, end: Option<i64>) -> (usize, usize) {
    let resolve = |index: i64| -> usize {
        if index < 0 {
            len.saturating_sub(index.unsigned_abs() as usize)
        } else {
            (index as usize).min(len)
        }
    };
    let from = resolve(start);
    let to = end.map_or(len, resolve);
    (from, to.max(from))
}
