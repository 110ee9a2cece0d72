//! Builder for creating specs
//!
//! Copyright (c) 2025 Shapey Team
//! Licensed under the Apache-2.0 license

use super::types::{Field, Mode, Transform, TransformsMode};
use super::Spec;
use crate::error::TransformResult;
use crate::safety::ErrorPolicy;
use serde_json::Value;

/// Fluent builder for [`Spec`]
#[derive(Debug, Clone, Default)]
pub struct SpecBuilder {
    spec: Spec,
}

impl SpecBuilder {
    /// Create a new spec builder
    pub fn new() -> Self {
        Self { spec: Spec::new() }
    }

    /// Add any field
    pub fn field(mut self, key: impl Into<String>, field: impl Into<Field>) -> Self {
        self.spec.insert(key, field);
        self
    }

    /// Add a transform field
    pub fn transform(self, key: impl Into<String>, transform: Transform) -> Self {
        self.field(key, Field::Transform(transform))
    }

    /// Add an infallible unary transform built from a closure
    pub fn map<F>(self, key: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.transform(key, Transform::map(f))
    }

    /// Add a fallible unary transform built from a closure
    pub fn try_map<F>(self, key: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value) -> TransformResult + Send + Sync + 'static,
    {
        self.transform(key, Transform::new(f))
    }

    /// Add a nested spec
    pub fn nested(self, key: impl Into<String>, spec: Spec) -> Self {
        self.field(key, Field::Nested(spec))
    }

    /// Add a literal value
    pub fn literal(self, key: impl Into<String>, value: Value) -> Self {
        self.field(key, Field::Literal(value))
    }

    /// Set the shaping mode
    pub fn mode(mut self, mode: Mode) -> Self {
        self.spec.set_mode(mode);
        self
    }

    /// Set how transforms are applied
    pub fn transforms(mut self, transforms: TransformsMode) -> Self {
        self.spec.set_transforms_mode(transforms);
        self
    }

    /// Set the transform error policy
    pub fn on_error(mut self, policy: ErrorPolicy) -> Self {
        self.spec.set_error_policy(policy);
        self
    }

    /// Log transform failures through `tracing`
    pub fn debug(self) -> Self {
        self.on_error(ErrorPolicy::log())
    }

    /// Build the spec
    pub fn build(self) -> Spec {
        self.spec
    }
}
