//! Whole-object application: every transform receives the entire input
//!
//! A [`WholeSpec`] is a spec compiled for whole-object application.
//! Literals become constants, nested specs are compiled recursively, and
//! the compiled spec accepts as many arguments as its widest transform,
//! broadcasting all of them to every field.
//!
//! Copyright (c) 2025 Shapey Team
//! Licensed under the Apache-2.0 license

use crate::combine::combine;
use crate::safety::{invoke, ErrorPolicy};
use crate::spec::{Field, Spec, Transform};
use serde_json::{Map, Value};
use std::slice;

#[derive(Debug, Clone)]
enum WholeField {
    Transform(Transform),
    Nested(WholeSpec),
}

impl WholeField {
    fn arity(&self) -> usize {
        match self {
            WholeField::Transform(transform) => transform.arity(),
            WholeField::Nested(nested) => nested.arity,
        }
    }
}

/// A spec compiled for whole-object application
#[derive(Debug, Clone)]
pub struct WholeSpec {
    fields: Vec<(String, WholeField)>,
    policy: ErrorPolicy,
    arity: usize,
}

impl WholeSpec {
    /// Compile a spec
    pub fn compile(spec: &Spec) -> Self {
        let fields: Vec<(String, WholeField)> = spec
            .iter()
            .map(|(key, field)| {
                let compiled = match field {
                    Field::Transform(transform) => WholeField::Transform(transform.clone()),
                    Field::Nested(nested) => WholeField::Nested(WholeSpec::compile(nested)),
                    Field::Literal(value) => WholeField::Transform(Transform::constant(value.clone())),
                };
                (key.to_string(), compiled)
            })
            .collect();
        let arity = fields.iter().map(|(_, field)| field.arity()).max().unwrap_or(0);

        Self {
            fields,
            policy: spec.error_policy().clone(),
            arity,
        }
    }

    /// Number of arguments the compiled spec takes
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Apply to an argument list; missing arguments up to the arity are `null`
    pub fn call(&self, args: &[Value]) -> Map<String, Value> {
        if args.len() < self.arity {
            let mut padded = args.to_vec();
            padded.resize(self.arity, Value::Null);
            return self.call_with(&padded);
        }
        self.call_with(args)
    }

    /// Apply to a single input
    pub fn apply(&self, input: &Value) -> Map<String, Value> {
        self.call(slice::from_ref(input))
    }

    fn call_with(&self, args: &[Value]) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|(key, field)| {
                let value = match field {
                    WholeField::Transform(transform) => invoke(transform, key, args, &self.policy),
                    WholeField::Nested(nested) => Value::Object(nested.call(args)),
                };
                (key.clone(), value)
            })
            .collect()
    }
}

/// Apply every spec field to the whole input; the output has exactly the spec's keys
pub fn map_spec(spec: &Spec, input: &Value) -> Map<String, Value> {
    WholeSpec::compile(spec).apply(input)
}

/// Blend the input with its whole-object reshaping: `combine(input, map_spec(spec, input))`
///
/// Mapping inputs gain (or have overridden) the spec's keys; any other
/// input comes back unchanged.
pub fn merge_spec(spec: &Spec, input: &Value) -> Value {
    combine(input, &Value::Object(map_spec(spec, input)))
}
