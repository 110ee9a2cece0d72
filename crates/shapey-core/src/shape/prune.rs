//! Field selection and removal
//!
//! In the keep/remove strategies a spec field is a *flag* when its value
//! is `true`, a transform, or a string equal to its own key (see
//! [`Spec::pruning_keys`]). Anything else in the spec is ignored for
//! selection purposes.
//!
//! Copyright (c) 2025 Shapey Team
//! Licensed under the Apache-2.0 license

use super::evolve::evolve_spec;
use crate::spec::Spec;
use crate::value;
use serde_json::{Map, Value};

/// Keep only the flagged keys of the input
pub fn keeper(spec: &Spec, input: &Value) -> Map<String, Value> {
    value::pick(&value::objectify(input), spec.pruning_keys())
}

/// Remove the flagged keys that are not transforms
pub fn remover(spec: &Spec, input: &Value) -> Map<String, Value> {
    let doomed = spec
        .pruning_keys()
        .into_iter()
        .filter(|key| !spec.get(key).is_some_and(|field| field.is_transform()));
    value::omit(&value::objectify(input), doomed)
}

/// [`keeper`], then prop-level transforms
pub fn keep_and_shape(spec: &Spec, input: &Value) -> Map<String, Value> {
    evolve_spec(&spec.transform_fields(), &Value::Object(keeper(spec, input)))
}

/// [`remover`], then prop-level transforms
pub fn remove_and_shape(spec: &Spec, input: &Value) -> Map<String, Value> {
    evolve_spec(&spec.transform_fields(), &Value::Object(remover(spec, input)))
}

/// Keep the input keys the spec names, whatever their spec values
pub fn implied_remove(spec: &Spec, input: &Value) -> Map<String, Value> {
    value::pick(&value::objectify(input), spec.keys())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::built_in;
    use serde_json::json;

    fn football() -> Value {
        json!({
            "kelly": "jim",
            "otto": "jim",
            "parker": "jim",
            "thorpe": "jim",
            "brown": "jim",
            "carr": "jim"
        })
    }

    #[test]
    fn test_keeper_honours_only_flags() {
        let spec = Spec::builder()
            .literal("brown", json!(0))
            .literal("kelly", json!(null))
            .literal("carr", json!(true))
            .literal("parker", json!("parker"))
            .literal("otto", json!("otto jim"))
            .build();
        assert_eq!(
            Value::Object(keeper(&spec, &football())),
            json!({"carr": "jim", "parker": "jim"})
        );
    }

    #[test]
    fn test_remover_keeps_transform_keys() {
        let spec = Spec::builder()
            .literal("caviezel", json!(true))
            .transform("fallon", built_in::append("my".into()))
            .build();
        assert_eq!(
            Value::Object(remover(&spec, &json!({"caviezel": "jim", "fallon": "jim", "kimmel": "jim"}))),
            json!({"fallon": "jim", "kimmel": "jim"})
        );
    }

    #[test]
    fn test_keep_and_shape() {
        let spec = Spec::builder()
            .literal("brown", json!(true))
            .literal("kelly", json!(true))
            .transform("otto", built_in::append("my".into()))
            .build();
        assert_eq!(
            Value::Object(keep_and_shape(&spec, &football())),
            json!({"brown": "jim", "kelly": "jim", "otto": "jimmy"})
        );
    }

    #[test]
    fn test_remove_and_shape() {
        let spec = Spec::builder()
            .literal("caviezel", json!(true))
            .transform("fallon", built_in::append("my".into()))
            .build();
        assert_eq!(
            Value::Object(remove_and_shape(&spec, &json!({"caviezel": "jim", "fallon": "jim"}))),
            json!({"fallon": "jimmy"})
        );
    }

    #[test]
    fn test_implied_remove_ignores_spec_values() {
        let spec = Spec::builder()
            .literal("thorpe", json!(false))
            .literal("nobody", json!(true))
            .build();
        assert_eq!(Value::Object(implied_remove(&spec, &football())), json!({"thorpe": "jim"}));
    }

    #[test]
    fn test_pruning_non_mapping_input() {
        let spec = Spec::builder().literal("a", json!(true)).build();
        assert!(keeper(&spec, &json!("a")).is_empty());
        assert!(remover(&spec, &json!([1])).is_empty());
    }
}
