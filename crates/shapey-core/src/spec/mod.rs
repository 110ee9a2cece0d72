//! Reshaping specs
//!
//! A [`Spec`] maps output field names to [`Field`]s and carries the control
//! settings that select a shaping strategy. Specs are built in code with
//! [`SpecBuilder`] or loaded from JSON/YAML data with [`SpecLoader`].
//!
//! # Module Organization
//!
//! - [`types`] - fields, transforms and the control enums
//! - [`builder`] - fluent builder API
//! - [`normalize`] - partitions of a spec used by the shaping engine
//! - [`loader`] - spec loading from data
//!
//! # Examples
//!
//! ```
//! use shapey_core::{Mode, Spec, Transform};
//! use serde_json::json;
//!
//! let spec = Spec::builder()
//!     .transform("carter", Transform::map(|v| json!(format!("{}my", v.as_str().unwrap_or("")))))
//!     .literal("dean", json!("james"))
//!     .mode(Mode::Strict)
//!     .build();
//!
//! assert_eq!(spec.len(), 2);
//! assert_eq!(spec.mode(), Mode::Strict);
//! ```

pub mod builder;
pub mod loader;
pub mod normalize;
pub mod types;

pub use builder::SpecBuilder;
pub use loader::SpecLoader;
pub use types::{
    is_control_key, Field, Mode, Transform, TransformsMode, CONTROL_KEYS, SHAPEY_DEBUG,
    SHAPEY_MODE, SHAPEY_TRANSFORMS,
};

use crate::safety::ErrorPolicy;
use serde_json::Value;

/// A declarative reshaping spec
#[derive(Debug, Clone, Default)]
pub struct Spec {
    fields: Vec<(String, Field)>,
    mode: Mode,
    transforms: TransformsMode,
    on_error: ErrorPolicy,
}

impl Spec {
    /// Create an empty loose spec
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fluent builder
    pub fn builder() -> SpecBuilder {
        SpecBuilder::new()
    }

    /// Load a spec from data using the built-in transform registry
    pub fn from_value(value: &Value) -> crate::Result<Self> {
        SpecLoader::default().load(value)
    }

    /// Insert a field, replacing any existing field under the same key
    ///
    /// Reserved keys never become fields: their values configure the spec
    /// instead (see [`Spec::configure`]).
    pub fn insert(&mut self, key: impl Into<String>, field: impl Into<Field>) {
        let key = key.into();
        let field = field.into();
        if is_control_key(&key) {
            self.configure(&key, field);
            return;
        }
        match self.fields.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = field,
            None => self.fields.push((key, field)),
        }
    }

    /// Chainable [`Spec::insert`]
    pub fn with(mut self, key: impl Into<String>, field: impl Into<Field>) -> Self {
        self.insert(key, field);
        self
    }

    /// Apply a reserved key
    ///
    /// Mode strings that match nothing fall back to the default. A transform
    /// under `shapeyDebug` becomes an error handler called with the error
    /// message, the field name and the failing value.
    pub fn configure(&mut self, key: &str, field: Field) {
        if key.eq_ignore_ascii_case(SHAPEY_MODE) {
            self.mode = match field.as_literal() {
                Some(Value::String(raw)) => Mode::parse(raw),
                _ => Mode::default(),
            };
        } else if key.eq_ignore_ascii_case(SHAPEY_TRANSFORMS) {
            self.transforms = match field.as_literal() {
                Some(Value::String(raw)) => TransformsMode::parse(raw),
                _ => TransformsMode::default(),
            };
        } else if key.eq_ignore_ascii_case(SHAPEY_DEBUG) {
            self.on_error = match field {
                Field::Literal(flag) => ErrorPolicy::from_flag(&flag),
                Field::Transform(handler) => ErrorPolicy::from_transform(handler),
                Field::Nested(_) => ErrorPolicy::Silent,
            };
        }
    }

    pub fn get(&self, key: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, field)| field)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<Field> {
        let index = self.fields.iter().position(|(existing, _)| existing == key)?;
        Some(self.fields.remove(index).1)
    }

    /// Field names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(key, field)| (key.as_str(), field))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn transforms_mode(&self) -> TransformsMode {
        self.transforms
    }

    pub fn set_transforms_mode(&mut self, transforms: TransformsMode) {
        self.transforms = transforms;
    }

    pub fn error_policy(&self) -> &ErrorPolicy {
        &self.on_error
    }

    pub fn set_error_policy(&mut self, policy: ErrorPolicy) {
        self.on_error = policy;
    }
}
