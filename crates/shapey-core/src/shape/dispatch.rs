//! Mode dispatch: picking and running the applicator a spec asks for
//!
//! A [`Shape`] is whatever can stand in a pipeline stage: a spec, a bare
//! transform, or a constant. Specs are dispatched on their two control
//! axes, both resolved into enums when the spec was built:
//!
//! | `shapeyTransforms` | `shapeyMode`            | result                                   |
//! |--------------------|-------------------------|------------------------------------------|
//! | default            | any                     | the mode's strategy                      |
//! | prop / whole       | keep, remove            | pruned input merged with the transforms  |
//! | prop / whole       | anything else           | the transforms alone                     |
//!
//! `prop` runs every field through [`always_evolve`], `whole` through
//! [`map_spec`]. Reserved keys are stripped from every mapping output.
//!
//! Copyright (c) 2025 Shapey Team
//! Licensed under the Apache-2.0 license

use super::evolve::{always_evolve, evolve_spec};
use super::map_spec::{map_spec, merge_spec};
use super::prune::{implied_remove, keep_and_shape, keeper, remove_and_shape, remover};
use super::shaper::{shape_loosely, shape_strictly, shape_super_loosely, shape_super_strictly};
use crate::error::Result;
use crate::safety::{invoke, ErrorPolicy};
use crate::spec::normalize::strip_control_keys;
use crate::spec::{Mode, Spec, SpecLoader, Transform, TransformsMode};
use crate::value;
use serde_json::{Map, Value};
use std::fmt;
use std::slice;
use std::sync::Arc;

/// Field name reported when a bare transform stage fails
const ROOT_FIELD: &str = "$";

/// Every public applicator, callable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Evolve,
    AlwaysEvolve,
    MapSpec,
    MergeSpec,
    Keep,
    Remove,
    KeepAndShape,
    RemoveAndShape,
    ImpliedRemove,
    Loose,
    Strict,
    SuperStrict,
    SuperLoose,
}

impl Strategy {
    /// The strategy `shapeyMode` selects when transforms run in default mode
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Loose => Strategy::Loose,
            Mode::Strict => Strategy::Strict,
            Mode::SuperStrict => Strategy::SuperStrict,
            Mode::SuperLoose => Strategy::SuperLoose,
            Mode::Keep => Strategy::KeepAndShape,
            Mode::Remove => Strategy::RemoveAndShape,
        }
    }

    /// Apply the strategy, ignoring the spec's own control settings
    pub fn apply(self, spec: &Spec, input: &Value) -> Value {
        let shaped = match self {
            Strategy::MergeSpec => return merge_spec(spec, input),
            Strategy::Evolve => evolve_spec(spec, input),
            Strategy::AlwaysEvolve => always_evolve(spec, input),
            Strategy::MapSpec => map_spec(spec, input),
            Strategy::Keep => keeper(spec, input),
            Strategy::Remove => remover(spec, input),
            Strategy::KeepAndShape => keep_and_shape(spec, input),
            Strategy::RemoveAndShape => remove_and_shape(spec, input),
            Strategy::ImpliedRemove => implied_remove(spec, input),
            Strategy::Loose => shape_loosely(spec, input),
            Strategy::Strict => shape_strictly(spec, input),
            Strategy::SuperStrict => shape_super_strictly(spec, input),
            Strategy::SuperLoose => shape_super_loosely(spec, input),
        };
        Value::Object(shaped)
    }

    /// Fix the spec, leaving a reusable function of the input
    pub fn bind(self, spec: Spec) -> impl Fn(&Value) -> Value + Send + Sync {
        move |input| self.apply(&spec, input)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Evolve => "evolve",
            Strategy::AlwaysEvolve => "always-evolve",
            Strategy::MapSpec => "map-spec",
            Strategy::MergeSpec => "merge-spec",
            Strategy::Keep => "keep",
            Strategy::Remove => "remove",
            Strategy::KeepAndShape => "keep-and-shape",
            Strategy::RemoveAndShape => "remove-and-shape",
            Strategy::ImpliedRemove => "implied-remove",
            Strategy::Loose => "loose",
            Strategy::Strict => "strict",
            Strategy::SuperStrict => "super-strict",
            Strategy::SuperLoose => "super-loose",
        };
        f.write_str(name)
    }
}

/// Shape a mapping according to the spec's control settings
pub fn shape_spec(spec: &Spec, input: &Value) -> Map<String, Value> {
    let mode = spec.mode();
    let transforms = spec.transforms_mode();
    tracing::debug!(mode = %mode, transforms = %transforms, fields = spec.len(), "Dispatching spec");

    let shaped = match transforms {
        TransformsMode::Default => match Strategy::for_mode(mode).apply(spec, input) {
            Value::Object(map) => map,
            _ => Map::new(),
        },
        TransformsMode::Prop | TransformsMode::Whole => {
            let computed = |fields: &Spec| match transforms {
                TransformsMode::Whole => map_spec(fields, input),
                _ => always_evolve(fields, input),
            };
            match mode {
                Mode::Keep => value::merge(&keeper(spec, input), &computed(&spec.transform_fields())),
                Mode::Remove => value::merge(&remover(spec, input), &computed(&spec.transform_fields())),
                _ => computed(spec),
            }
        }
    };
    strip_control_keys(shaped)
}

/// Anything that can reshape a value
#[derive(Debug, Clone)]
pub enum Shape {
    /// Dispatched on its mode settings
    Spec(Spec),
    /// Applied directly to the input
    Transform(Transform),
    /// Returned as-is, ignoring the input
    Constant(Value),
}

impl Shape {
    /// Load a shape from data with the built-in transform registry
    pub fn from_value(value: &Value) -> Result<Self> {
        SpecLoader::default().load_shape(value)
    }
}

impl From<Spec> for Shape {
    fn from(spec: Spec) -> Self {
        Shape::Spec(spec)
    }
}

impl From<Transform> for Shape {
    fn from(transform: Transform) -> Self {
        Shape::Transform(transform)
    }
}

impl From<Value> for Shape {
    fn from(value: Value) -> Self {
        Shape::Constant(value)
    }
}

/// Reshape `input` with whatever `shape` is
///
/// A failing bare transform yields `null`.
pub fn make_shaper(shape: &Shape, input: &Value) -> Value {
    match shape {
        Shape::Spec(spec) => Value::Object(shape_spec(spec, input)),
        Shape::Transform(transform) => {
            tracing::debug!(transform = ?transform.name(), "Applying bare transform");
            invoke(transform, ROOT_FIELD, slice::from_ref(input), &ErrorPolicy::Silent)
        }
        Shape::Constant(constant) => constant.clone(),
    }
}

/// A shape fixed ahead of its input
///
/// ```
/// use shapey_core::{Mode, Shaper, Spec, Transform};
/// use serde_json::json;
///
/// let shaper = Shaper::new(
///     Spec::builder()
///         .transform("name", Transform::map(|v| json!(v.as_str().unwrap_or("").to_uppercase())))
///         .mode(Mode::Strict)
///         .build(),
/// );
/// assert_eq!(shaper.apply(&json!({"name": "jim", "age": 27})), json!({"name": "JIM"}));
/// ```
#[derive(Debug, Clone)]
pub struct Shaper {
    shape: Arc<Shape>,
}

impl Shaper {
    pub fn new(shape: impl Into<Shape>) -> Self {
        Self {
            shape: Arc::new(shape.into()),
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn apply(&self, input: &Value) -> Value {
        make_shaper(&self.shape, input)
    }

    /// Turn into a plain closure
    pub fn into_fn(self) -> impl Fn(&Value) -> Value + Send + Sync {
        move |input| self.apply(input)
    }

    /// Turn into a transform, so a whole shape can sit inside another spec
    pub fn into_transform(self) -> Transform {
        Transform::map(move |input| self.apply(input))
    }
}
