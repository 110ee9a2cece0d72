//! Composite shaping strategies
//!
//! Every strategy is the same two-layer composition:
//!
//! 1. literal spec fields are laid over the input (objectified);
//! 2. a *prop layer* computes the spec's transform and nested fields;
//!    a nested spec whose key the input lacks is shaped against an
//!    empty mapping, so its literals still appear;
//! 3. transform fields the prop layer did not produce are applied in
//!    whole-object mode and merged on top. They see the prop layer's
//!    output, or the original input when that output is empty.
//!
//! The strategies differ only in the prop layer.
//!
//! Copyright (c) 2025 Shapey Team
//! Licensed under the Apache-2.0 license

use super::evolve::{always_evolve, evolve_spec};
use super::map_spec::map_spec;
use crate::spec::{Field, Spec};
use crate::value;
use serde_json::{Map, Value};

/// How the first layer computes spec fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropLayer {
    /// [`evolve_spec`] over the input's keys
    Evolve,
    /// [`always_evolve`] over every spec key, literals included
    AlwaysEvolve,
    /// Whole-object transforms merged over the input
    Whole,
}

impl PropLayer {
    fn apply(self, spec: &Spec, merged: Map<String, Value>, input: &Value) -> Map<String, Value> {
        let shaping = spec.shaping_fields();
        match self {
            PropLayer::Evolve => evolve_spec(&shaping, &Value::Object(merged)),
            PropLayer::AlwaysEvolve => always_evolve(spec, &Value::Object(merged)),
            PropLayer::Whole => {
                let source = if value::is_plain_mapping(input) {
                    Value::Object(merged.clone())
                } else {
                    input.clone()
                };
                value::merge(&merged, &map_spec(&shaping, &source))
            }
        }
    }
}

/// The composition shared by every strategy
pub fn base_shaper(layer: PropLayer, spec: &Spec, input: &Value) -> Map<String, Value> {
    let merged = value::merge(&value::objectify(input), &spec.literal_fields());
    let mut prop = layer.apply(spec, merged, input);
    for (key, field) in spec.iter() {
        if let Field::Nested(nested) = field {
            if !prop.contains_key(key) {
                let shaped = shape_loosely(nested, &Value::Object(Map::new()));
                prop.insert(key.to_string(), Value::Object(shaped));
            }
        }
    }

    let remaining = spec.select(|key, field| field.is_transform() && !prop.contains_key(key));
    if remaining.is_empty() {
        return prop;
    }

    let whole_input = if prop.is_empty() {
        input.clone()
    } else {
        Value::Object(prop.clone())
    };
    value::merge(&prop, &map_spec(&remaining, &whole_input))
}

/// Input keys pass through, spec fields are layered on top
///
/// Transforms whose key the input has run prop-level; the others run
/// whole-object.
pub fn shape_loosely(spec: &Spec, input: &Value) -> Map<String, Value> {
    base_shaper(PropLayer::Evolve, spec, input)
}

/// [`shape_loosely`], restricted to the spec's keys
pub fn shape_strictly(spec: &Spec, input: &Value) -> Map<String, Value> {
    let shaped = shape_loosely(spec, input);
    value::pick(&shaped, spec.keys())
}

/// Exactly the spec's keys, each one always present
///
/// Transforms run prop-level even for keys the input lacks, receiving `null`.
pub fn shape_super_strictly(spec: &Spec, input: &Value) -> Map<String, Value> {
    base_shaper(PropLayer::AlwaysEvolve, spec, input)
}

/// Input keys pass through and every transform sees the whole input
///
/// Literals override input keys of the same name. Transforms never run
/// prop-level: each one receives the merged mapping, or the raw input
/// when that is not a plain mapping.
pub fn shape_super_loosely(spec: &Spec, input: &Value) -> Map<String, Value> {
    base_shaper(PropLayer::Whole, spec, input)
}
