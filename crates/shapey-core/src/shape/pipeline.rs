//! Sequential pipelines of shapes
//!
//! Copyright (c) 2025 Shapey Team
//! Licensed under the Apache-2.0 license

use super::dispatch::{make_shaper, Shape};
use crate::error::Result;
use crate::spec::SpecLoader;
use serde_json::Value;

/// An ordered list of stages, each fed the previous stage's output
#[derive(Debug, Clone, Default)]
pub struct Shapeline {
    stages: Vec<Shape>,
}

impl Shapeline {
    /// Create an empty pipeline; running it returns the input
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_shapes(stages: Vec<Shape>) -> Self {
        Self { stages }
    }

    /// Load a pipeline document (an array of stages) with the built-in registry
    pub fn from_value(value: &Value) -> Result<Self> {
        SpecLoader::default().load_pipeline(value).map(Self::from_shapes)
    }

    /// Append a stage
    pub fn stage(mut self, shape: impl Into<Shape>) -> Self {
        self.stages.push(shape.into());
        self
    }

    pub fn stages(&self) -> &[Shape] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn run(&self, input: &Value) -> Value {
        shapeline(&self.stages, input)
    }
}

impl FromIterator<Shape> for Shapeline {
    fn from_iter<I: IntoIterator<Item = Shape>>(iter: I) -> Self {
        Self::from_shapes(iter.into_iter().collect())
    }
}

/// Thread `input` through every stage in order
pub fn shapeline(stages: &[Shape], input: &Value) -> Value {
    let total = stages.len();
    stages
        .iter()
        .enumerate()
        .fold(input.clone(), |current, (index, stage)| {
            tracing::debug!(stage = index + 1, total = total, "Running pipeline stage");
            make_shaper(stage, &current)
        })
}
