//! The spec-application engine
//!
//! Applicators come in three layers:
//!
//! - field applicators ([`evolve_spec`], [`always_evolve`], [`map_spec`])
//!   decide what each spec field receives;
//! - strategies ([`shape_loosely`] and friends, plus the pruning
//!   functions) compose them into a reshape;
//! - the dispatcher ([`make_shaper`], [`Shaper`], [`Shapeline`]) picks a
//!   strategy from the spec's own control settings.
//!
//! No applicator fails. Transform failures are resolved per field by the
//! spec's [`ErrorPolicy`](crate::ErrorPolicy), and non-mapping inputs are
//! treated as empty mappings wherever a mapping is needed.
//!
//! # Examples
//!
//! ```
//! use shapey_core::shape::{shape_loosely, shape_strictly};
//! use shapey_core::{Spec, Transform};
//! use serde_json::{json, Value};
//!
//! let spec = Spec::builder()
//!     .literal("morrison", json!("Van"))
//!     .transform("count", Transform::map(|v| json!(v.as_object().map_or(0, |m| m.len()))))
//!     .build();
//! let input = json!({"morrison": "jim", "hendrix": "jim"});
//!
//! assert_eq!(
//!     Value::Object(shape_loosely(&spec, &input)),
//!     json!({"morrison": "Van", "hendrix": "jim", "count": 2})
//! );
//! assert_eq!(
//!     Value::Object(shape_strictly(&spec, &input)),
//!     json!({"morrison": "Van", "count": 2})
//! );
//! ```
//!
//! Copyright (c) 2025 Shapey Team
//! Licensed under the Apache-2.0 license

pub mod dispatch;
pub mod evolve;
pub mod map_spec;
pub mod pipeline;
pub mod prune;
pub mod shaper;


pub use dispatch::{make_shaper, shape_spec, Shape, Shaper, Strategy};
pub use evolve::{always_evolve, evolve_spec};
pub use map_spec::{map_spec, merge_spec, WholeSpec};
pub use pipeline::{shapeline, Shapeline};
pub use prune::{implied_remove, keep_and_shape, keeper, remove_and_shape, remover};
pub use shaper::{
    base_shaper, shape_loosely, shape_strictly, shape_super_loosely, shape_super_strictly,
    PropLayer,
};
