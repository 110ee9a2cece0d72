//! Shapey Core - declarative, spec-driven reshaping of JSON-like values
//!
//! A spec maps output field names to transforms, nested specs, or literal
//! values. Applying it to an input produces a new value; reserved spec keys
//! (`shapeyMode`, `shapeyTransforms`, `shapeyDebug`) select the strategy and
//! the transform error policy.
//!
//! # Main Components
//!
//! - **Specs**: [`Spec`], [`Field`], [`Transform`] and the builder/loader in [`spec`]
//! - **Combine**: [`combine`], the type-directed merge of two values
//! - **Shaping**: field applicators, strategies and the mode dispatcher in [`shape`]
//! - **Safety**: per-field failure isolation in [`safety`]
//! - **Built-ins**: named transforms for specs loaded from data in [`built_in`]
//!
//! # Example
//!
//! ```
//! use shapey_core::{shapeline, Shape, Spec, Transform};
//! use serde_json::json;
//!
//! let stats = Spec::builder()
//!     .transform("sum", shapey_core::built_in::sum())
//!     .transform("count", shapey_core::built_in::length())
//!     .build();
//! let average = Transform::map(|s| {
//!     json!(s["sum"].as_f64().unwrap_or(0.0) / s["count"].as_f64().unwrap_or(1.0))
//! });
//!
//! let result = shapeline(&[Shape::from(stats), Shape::from(average)], &json!([1, 2, 3, 6]));
//! assert_eq!(result, json!(3.0));
//! ```

pub mod built_in;
pub mod combine;
pub mod error;
pub mod safety;
pub mod shape;
pub mod spec;
pub mod value;

pub use built_in::TransformRegistry;
pub use combine::{combine, combine_with};
pub use error::{Error, Result, TransformError, TransformResult};
pub use safety::{wrap_transforms, Diagnostics, ErrorPolicy, TracingDiagnostics};
pub use shape::{
    always_evolve, evolve_spec, implied_remove, keep_and_shape, keeper, make_shaper, map_spec,
    merge_spec, remove_and_shape, remover, shape_loosely, shape_spec, shape_strictly,
    shape_super_loosely, shape_super_strictly, shapeline, Shape, Shaper, Shapeline, Strategy,
    WholeSpec,
};
pub use spec::{Field, Mode, Spec, SpecBuilder, SpecLoader, Transform, TransformsMode};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The default shaper; the same as [`shape_loosely`]
pub fn shape(spec: &Spec, input: &serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    shape_loosely(spec, input)
}
