//! Spec loading from JSON/YAML data
//!
//! Data has no functions, so transforms are referenced by name:
//!
//! ```json
//! {
//!   "shapeyMode": "strict",
//!   "carter": {"$transform": "append", "args": ["my"]},
//!   "dean": "james",
//!   "address": {"state": {"$transform": "upper"}}
//! }
//! ```
//!
//! An object holding a `$transform` key is a transform reference; any other
//! object is a nested spec; everything else is a literal.
//!
//! Copyright (c) 2025 Shapey Team
//! Licensed under the Apache-2.0 license

use super::types::{is_control_key, Field, Mode, TransformsMode, SHAPEY_MODE, SHAPEY_TRANSFORMS};
use super::Spec;
use crate::built_in::TransformRegistry;
use crate::error::{Error, Result};
use crate::shape::Shape;
use serde_json::{Map, Value};

/// Key marking a transform reference
pub const TRANSFORM_KEY: &str = "$transform";
/// Key holding a transform reference's arguments
pub const ARGS_KEY: &str = "args";

/// Loads specs from data, resolving transforms through a registry
#[derive(Debug, Clone)]
pub struct SpecLoader {
    registry: TransformRegistry,
}

impl Default for SpecLoader {
    fn default() -> Self {
        Self::new(TransformRegistry::with_built_ins())
    }
}

impl SpecLoader {
    /// Create a loader using the given registry
    pub fn new(registry: TransformRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &TransformRegistry {
        &self.registry
    }

    /// Load a spec document; it must be an object
    pub fn load(&self, value: &Value) -> Result<Spec> {
        match value {
            Value::Object(map) => self.load_object(map, "$"),
            other => Err(Error::invalid_spec(
                format!("expected an object, found {}", crate::value::type_name(other)),
                "$",
            )),
        }
    }

    /// Load a single pipeline stage: objects become specs, anything else a constant
    pub fn load_shape(&self, value: &Value) -> Result<Shape> {
        match value {
            Value::Object(map) if !map.contains_key(TRANSFORM_KEY) => {
                Ok(Shape::Spec(self.load_object(map, "$")?))
            }
            Value::Object(map) => Ok(Shape::Transform(self.load_transform(map, "$")?)),
            other => Ok(Shape::Constant(other.clone())),
        }
    }

    /// Load a pipeline document; it must be an array of stages
    pub fn load_pipeline(&self, value: &Value) -> Result<Vec<Shape>> {
        let stages = value.as_array().ok_or_else(|| {
            Error::invalid_spec(
                format!("expected an array of stages, found {}", crate::value::type_name(value)),
                "$",
            )
        })?;
        stages
            .iter()
            .enumerate()
            .map(|(index, stage)| {
                self.load_shape(stage).map_err(|err| match err {
                    Error::InvalidSpec { message, path } => Error::InvalidSpec {
                        message: format!("stage {}: {}", index, message),
                        path,
                    },
                    other => other,
                })
            })
            .collect()
    }

    fn load_object(&self, map: &Map<String, Value>, path: &str) -> Result<Spec> {
        let mut spec = Spec::new();
        for (key, value) in map {
            let field_path = format!("{}.{}", path, key);
            if is_control_key(key) {
                warn_unrecognized(key, value, &field_path);
                spec.configure(key, Field::Literal(value.clone()));
                continue;
            }
            let field = self.load_field(value, &field_path)?;
            spec.insert(key.clone(), field);
        }
        Ok(spec)
    }

    fn load_field(&self, value: &Value, path: &str) -> Result<Field> {
        match value {
            Value::Object(map) if map.contains_key(TRANSFORM_KEY) => {
                Ok(Field::Transform(self.load_transform(map, path)?))
            }
            Value::Object(map) => Ok(Field::Nested(self.load_object(map, path)?)),
            other => Ok(Field::Literal(other.clone())),
        }
    }

    fn load_transform(&self, map: &Map<String, Value>, path: &str) -> Result<super::Transform> {
        let name = match map.get(TRANSFORM_KEY) {
            Some(Value::String(name)) => name.as_str(),
            _ => {
                return Err(Error::invalid_spec(
                    format!("{} must name a transform", TRANSFORM_KEY),
                    path,
                ))
            }
        };
        if let Some(extra) = map.keys().find(|key| *key != TRANSFORM_KEY && *key != ARGS_KEY) {
            return Err(Error::invalid_spec(
                format!("unexpected key '{}' in transform reference", extra),
                path,
            ));
        }
        let args = match map.get(ARGS_KEY) {
            None => Vec::new(),
            Some(Value::Array(args)) => args.clone(),
            Some(single) => vec![single.clone()],
        };

        tracing::trace!(transform = name, path = path, "Resolving transform reference");
        self.registry
            .build(name, &args)
            .ok_or_else(|| Error::UnknownTransform {
                name: name.to_string(),
                path: path.to_string(),
            })?
    }
}

fn warn_unrecognized(key: &str, value: &Value, path: &str) {
    let recognized = if key.eq_ignore_ascii_case(SHAPEY_MODE) {
        value.as_str().and_then(Mode::recognize).is_some()
    } else if key.eq_ignore_ascii_case(SHAPEY_TRANSFORMS) {
        value.as_str().and_then(TransformsMode::recognize).is_some()
    } else {
        matches!(value, Value::Bool(_) | Value::Null)
            || value
                .as_str()
                .is_some_and(|s| s.trim().eq_ignore_ascii_case("skip"))
    };
    if !recognized {
        tracing::warn!(path = path, value = %value, "Unrecognized {} value, using default", key);
    }
}
