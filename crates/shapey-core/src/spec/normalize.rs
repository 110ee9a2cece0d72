//! Partitions of a spec used by the shaping engine
//!
//! Sub-specs produced here keep their parent's error policy, so a transform
//! fails the same way whichever applicator ends up running it. They never
//! keep the parent's mode settings.

use super::types::{is_control_key, Field};
use super::Spec;
use serde_json::{Map, Value};

impl Spec {
    /// Sub-spec of the fields matching `keep`
    pub fn select<P>(&self, mut keep: P) -> Spec
    where
        P: FnMut(&str, &Field) -> bool,
    {
        let mut selected = Spec::new();
        selected.set_error_policy(self.error_policy().clone());
        for (key, field) in self.iter() {
            if keep(key, field) {
                selected.insert(key, field.clone());
            }
        }
        selected
    }

    /// Only the transform fields
    pub fn transform_fields(&self) -> Spec {
        self.select(|_, field| field.is_transform())
    }

    /// Transform and nested fields: everything computed from input
    pub fn shaping_fields(&self) -> Spec {
        self.select(|_, field| !matches!(field, Field::Literal(_)))
    }

    /// The literal fields as a mapping
    pub fn literal_fields(&self) -> Map<String, Value> {
        self.iter()
            .filter_map(|(key, field)| field.as_literal().map(|value| (key.to_string(), value.clone())))
            .collect()
    }

    /// Keys flagged for keeping or removal
    ///
    /// A field is flagged when its value is `true`, a transform, or a
    /// string equal to its own key.
    pub fn pruning_keys(&self) -> Vec<&str> {
        self.iter()
            .filter(|(key, field)| match field {
                Field::Transform(_) => true,
                Field::Literal(Value::Bool(true)) => true,
                Field::Literal(Value::String(name)) => name == key,
                _ => false,
            })
            .map(|(key, _)| key)
            .collect()
    }
}

/// Remove every reserved key from an output mapping
pub fn strip_control_keys(mut output: Map<String, Value>) -> Map<String, Value> {
    output.retain(|key, _| !is_control_key(key));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::safety::ErrorPolicy;
    use crate::spec::Transform;
    use serde_json::json;

    fn mixed_spec() -> Spec {
        Spec::builder()
            .map("fallon", |v| v.clone())
            .literal("caviezel", json!(true))
            .literal("kimmel", json!(null))
            .literal("curtis", json!("curtis"))
            .literal("page", json!("jimmy"))
            .nested("stars", Spec::new().with("kirk", json!("james t.")))
            .on_error(ErrorPolicy::Skip)
            .build()
    }

    #[test]
    fn test_partitions() {
        let spec = mixed_spec();
        assert_eq!(spec.transform_fields().keys().collect::<Vec<_>>(), vec!["fallon"]);
        assert_eq!(
            spec.shaping_fields().keys().collect::<Vec<_>>(),
            vec!["fallon", "stars"]
        );
        assert_eq!(
            Value::Object(spec.literal_fields()),
            json!({"caviezel": true, "kimmel": null, "curtis": "curtis", "page": "jimmy"})
        );
    }

    #[test]
    fn test_sub_specs_keep_error_policy() {
        let spec = mixed_spec();
        assert!(matches!(spec.transform_fields().error_policy(), ErrorPolicy::Skip));
    }

    #[test]
    fn test_pruning_keys() {
        let spec = mixed_spec().with("zero", Transform::constant(json!(0)));
        assert_eq!(spec.pruning_keys(), vec!["fallon", "caviezel", "curtis", "zero"]);
    }

    #[test]
    fn test_strip_control_keys() {
        let output = strip_control_keys(
            json!({"shapeyMode": "strict", "SHAPEYDEBUG": true, "shapeyFoo": 2, "jim": 1})
                .as_object()
                .cloned()
                .unwrap_or_default(),
        );
        assert_eq!(Value::Object(output), json!({"shapeyFoo": 2, "jim": 1}));
    }
}
