//! Prop-level application: each transform receives its own key's value
//!
//! Copyright (c) 2025 Shapey Team
//! Licensed under the Apache-2.0 license

use crate::safety::invoke;
use crate::spec::{Field, Spec};
use serde_json::{Map, Value};
use std::slice;

static NULL: Value = Value::Null;

/// Evolve the input's own keys through the spec
///
/// Keys are taken from the input, never from the spec: a transform runs on
/// its key's value, a nested spec recurses, a literal overrides, and keys the
/// spec does not mention pass through. A non-mapping input yields an empty
/// mapping.
pub fn evolve_spec(spec: &Spec, input: &Value) -> Map<String, Value> {
    let object = match input {
        Value::Object(object) => object,
        _ => return Map::new(),
    };

    let mut result = Map::new();
    for (key, value) in object {
        let evolved = match spec.get(key) {
            Some(Field::Transform(transform)) => {
                invoke(transform, key, slice::from_ref(value), spec.error_policy())
            }
            Some(Field::Nested(nested)) => Value::Object(evolve_spec(nested, value)),
            Some(Field::Literal(literal)) => literal.clone(),
            None => value.clone(),
        };
        result.insert(key.clone(), evolved);
    }
    result
}

/// Apply every spec key, whether or not the input has it
///
/// Transforms see `null` for absent keys, nested specs recurse on whatever
/// is there (an empty mapping when nothing is), literals are emitted as-is.
/// Keys only the input has are dropped.
pub fn always_evolve(spec: &Spec, input: &Value) -> Map<String, Value> {
    let mut result = Map::new();
    for (key, field) in spec.iter() {
        let current = input.get(key).unwrap_or(&NULL);
        let evolved = match field {
            Field::Transform(transform) => {
                invoke(transform, key, slice::from_ref(current), spec.error_policy())
            }
            Field::Nested(nested) => Value::Object(always_evolve(nested, current)),
            Field::Literal(literal) => literal.clone(),
        };
        result.insert(key.to_string(), evolved);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::built_in;
    use crate::spec::Transform;
    use serde_json::json;

    #[test]
    fn test_evolve_overrides_transforms_and_passes_through() {
        let spec = Spec::builder()
            .literal("lebron", json!("james"))
            .transform("parsons", built_in::slice(0, Some(3)))
            .build();
        let result = evolve_spec(&spec, &json!({"parsons": "jimmy", "lebron": "jim", "dammit": "jim"}));
        assert_eq!(
            Value::Object(result),
            json!({"parsons": "jim", "lebron": "james", "dammit": "jim"})
        );
    }

    #[test]
    fn test_evolve_never_adds_keys() {
        let spec = Spec::builder()
            .literal("carrey", json!("jim"))
            .transform("jones", built_in::append(" earl".into()))
            .build();
        let result = evolve_spec(&spec, &json!({"jones": "james", "dean": "james"}));
        assert_eq!(Value::Object(result), json!({"jones": "james earl", "dean": "james"}));
    }

    #[test]
    fn test_evolve_non_mapping_input() {
        let spec = Spec::builder().literal("lebron", json!("james")).build();
        assert!(evolve_spec(&spec, &Value::Null).is_empty());
        assert!(evolve_spec(&spec, &json!(["lebron"])).is_empty());
    }

    #[test]
    fn test_evolve_recurses_into_nested_specs() {
        let spec = Spec::builder()
            .nested("address", Spec::builder().transform("state", built_in::upper()).build())
            .build();
        let result = evolve_spec(
            &spec,
            &json!({"address": {"state": "or", "zip": 97403}, "name": "burns"}),
        );
        assert_eq!(
            Value::Object(result),
            json!({"address": {"state": "OR", "zip": 97403}, "name": "burns"})
        );
    }

    #[test]
    fn test_always_evolve_applies_to_absent_keys() {
        let spec = Spec::builder()
            .transform("bo", built_in::identity())
            .transform("bag", Transform::constant(json!("gym")))
            .build();
        assert_eq!(
            Value::Object(always_evolve(&spec, &Value::Null)),
            json!({"bo": null, "bag": "gym"})
        );
    }

    #[test]
    fn test_always_evolve_is_spec_driven() {
        let spec = Spec::builder()
            .literal("brown", json!("james"))
            .transform("bag", built_in::default_value(json!("gym")))
            .nested("band", Spec::builder().literal("lead", json!("jim")).build())
            .build();
        let result = always_evolve(&spec, &json!({"beam": "jim", "brown": "jim", "band": 3}));
        assert_eq!(
            Value::Object(result),
            json!({"brown": "james", "bag": "gym", "band": {"lead": "jim"}})
        );
    }
}
