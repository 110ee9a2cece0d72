//! Integration tests for the public shaping API
//!
//! Specs here are built both in code and from JSON documents, and run
//! through the same entry points a caller would use.

use serde_json::{json, Value};
use shapey_core::{
    always_evolve, built_in, combine, combine_with, evolve_spec, make_shaper, map_spec,
    remove_and_shape, shape, shape_loosely, shape_strictly, shapeline, Error, ErrorPolicy, Mode,
    Shape, Shaper, Shapeline, Spec, SpecLoader, Strategy, Transform, TransformRegistry,
    TransformsMode, WholeSpec,
};

fn numbers() -> Value {
    json!([3, 4, 9, -3, 82, 274, 1334, 3, 13, 14, 47, 20])
}

#[test]
fn test_empty_spec_is_identity() {
    let input = json!({"kirk": "jim", "jones": ["james", "earl"], "n": 1.5});
    let once = Value::Object(shape_loosely(&Spec::new(), &input));
    assert_eq!(once, input);
    assert_eq!(Value::Object(shape_loosely(&Spec::new(), &once)), once);
}

#[test]
fn test_combine_scenarios() {
    assert_eq!(combine(&json!(1), &json!(2)), json!(3));
    assert_eq!(combine(&json!("foo"), &json!("bar")), json!("foobar"));
    assert_eq!(combine(&json!([1, 2, 3]), &json!([4, 5, 6])), json!([1, 2, 3, 4, 5, 6]));
    assert_eq!(
        combine(&json!({"lorem": "ipsum"}), &json!({"dolor": "sit"})),
        json!({"lorem": "ipsum", "dolor": "sit"})
    );
    assert_eq!(combine(&json!(2), &json!("two")), json!(2));
    assert_eq!(combine(&json!("two"), &json!(2)), json!("two"));
    assert_eq!(combine(&json!(true), &json!(false)), json!(true));
    assert_eq!(combine(&json!({}), &json!(false)), json!({}));
    assert_eq!(combine(&json!([1, 2, 3]), &json!({})), json!([1, 2, 3]));
    assert_eq!(combine(&json!({"a": "b"}), &json!([1, 2, 3])), json!({"a": "b"}));
    assert_eq!(combine(&Value::Null, &Value::Null), Value::Null);

    let add_two = combine_with(json!(2));
    assert_eq!(add_two(&json!(40)), json!(42));
}

#[test]
fn test_evolve_spec_scenario() {
    let spec = Spec::builder()
        .literal("lebron", json!("james"))
        .transform("parsons", built_in::slice(0, Some(3)))
        .build();
    assert_eq!(
        Value::Object(evolve_spec(&spec, &json!({"parsons": "jimmy", "lebron": "jim", "dammit": "jim"}))),
        json!({"parsons": "jim", "lebron": "james", "dammit": "jim"})
    );
    assert!(evolve_spec(&spec, &Value::Null).is_empty());
}

#[test]
fn test_always_evolve_scenario() {
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
fn test_map_spec_scenario() {
    let spec = Spec::builder()
        .map("hendrix", |o| json!(format!("{}mi", o["hendrix"].as_str().unwrap_or(""))))
        .map("carter", |o| json!(format!("{}my", o["carter"].as_str().unwrap_or(""))))
        .build();
    assert_eq!(
        Value::Object(map_spec(&spec, &json!({"morrison": "jim", "hendrix": "jim", "carter": "jim"}))),
        json!({"hendrix": "jimmi", "carter": "jimmy"})
    );
}

#[test]
fn test_strict_output_is_subset_of_spec_keys() {
    let spec = Spec::builder()
        .literal("morrison", json!("Van"))
        .transform("carter", built_in::append("my".into()))
        .transform("absent", built_in::length())
        .build();
    let shaped = shape_strictly(&spec, &json!({"morrison": "jim", "hendrix": "jim", "carter": "jim"}));
    let spec_keys: Vec<&str> = spec.keys().collect();
    assert!(shaped.keys().all(|key| spec_keys.contains(&key.as_str())));
    assert_eq!(shaped["carter"], json!("jimmy"));
    assert_eq!(shaped["absent"], json!(3), "absent key is computed from the whole input");
}

#[test]
fn test_remove_and_shape_scenario() {
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
fn test_shapeline_average_scenario() {
    let stats = Spec::builder()
        .transform("sum", built_in::sum())
        .transform("count", built_in::length())
        .build();
    let average = Transform::map(|s| {
        let count = s["count"].as_f64().filter(|c| *c != 0.0).unwrap_or(1.0);
        json!(s["sum"].as_f64().unwrap_or(0.0) / count)
    });
    assert_eq!(
        shapeline(&[Shape::from(stats), Shape::from(average)], &numbers()),
        json!(150.0)
    );
}

#[test]
fn test_throwing_transform_leaves_siblings_intact() {
    let spec = Spec::builder()
        .map("boom", |_| panic!("transform blew up"))
        .transform("name", built_in::upper())
        .literal("dean", json!("james"))
        .build();
    assert_eq!(
        Value::Object(shape(&spec, &json!({"boom": 1, "name": "jim"}))),
        json!({"boom": null, "name": "JIM", "dean": "james"})
    );
}

#[test]
fn test_spec_loaded_from_json_document() {
    let spec = Spec::from_value(&json!({
        "shapeyMode": "Super Strict",
        "name": {"$transform": "upper"},
        "greeting": {"$transform": "prepend", "args": ["hello "]},
        "visits": {"$transform": "default", "args": [0]},
        "source": "import"
    }))
    .expect("spec loads");
    assert_eq!(spec.mode(), Mode::SuperStrict);

    let shaped = make_shaper(&Shape::from(spec), &json!({"name": "jim", "greeting": "jim", "junk": 1}));
    assert_eq!(
        shaped,
        json!({"name": "JIM", "greeting": "hello jim", "visits": 0, "source": "import"})
    );
}

#[test]
fn test_shapey_transforms_from_data() {
    let shaper = Shaper::new(
        Shape::from_value(&json!({
            "shapeyTransforms": "whole",
            "total": {"$transform": "get", "args": ["sum"]},
            "names": {"$transform": "keys"}
        }))
        .expect("shape loads"),
    );
    assert_eq!(
        shaper.apply(&json!({"sum": 3, "other": true})),
        json!({"total": 3, "names": ["sum", "other"]})
    );
}

#[test]
fn test_loader_errors() {
    assert!(matches!(
        Spec::from_value(&json!("strict")),
        Err(Error::InvalidSpec { .. })
    ));
    assert!(matches!(
        Spec::from_value(&json!({"a": {"$transform": "nope"}})),
        Err(Error::UnknownTransform { .. })
    ));
    assert!(matches!(
        Spec::from_value(&json!({"a": {"$transform": "append", "args": [1]}})),
        Err(Error::InvalidTransformArgs { .. })
    ));
}

#[test]
fn test_custom_registry() {
    let mut registry = TransformRegistry::with_built_ins();
    registry.register("times", |args| {
        let factor = args.first().and_then(Value::as_i64).unwrap_or(1);
        Ok(Transform::map(move |v| json!(v.as_i64().unwrap_or(0) * factor)))
    });
    let loader = SpecLoader::new(registry);
    let spec = loader
        .load(&json!({"n": {"$transform": "times", "args": [3]}}))
        .expect("spec loads");
    assert_eq!(Value::Object(shape(&spec, &json!({"n": 14}))), json!({"n": 42}));
}

#[test]
fn test_strategies_by_name() {
    let spec = Spec::builder()
        .literal("kirk", json!(true))
        .transform("jones", built_in::append(" earl".into()))
        .build();
    let input = json!({"kirk": "jim", "jones": "james", "dean": "james"});

    assert_eq!(Strategy::Keep.apply(&spec, &input), json!({"kirk": "jim", "jones": "james"}));
    assert_eq!(Strategy::Remove.apply(&spec, &input), json!({"jones": "james", "dean": "james"}));
    assert_eq!(
        Strategy::KeepAndShape.apply(&spec, &input),
        json!({"kirk": "jim", "jones": "james earl"})
    );
    assert_eq!(Strategy::ImpliedRemove.apply(&spec, &input), json!({"kirk": "jim", "jones": "james"}));
    assert_eq!(
        Strategy::MergeSpec.apply(&spec, &input),
        json!({"kirk": true, "jones": null, "dean": "james"}),
        "appending to the whole input fails and yields null"
    );
}

#[test]
fn test_whole_spec_is_reusable_and_arity_aware() {
    let spec = Spec::builder()
        .transform("pair", Transform::variadic(2, |args| Ok(json!([args[0], args[1]]))))
        .literal("tag", json!("p"))
        .build();
    let compiled = WholeSpec::compile(&spec);
    assert_eq!(compiled.arity(), 2);
    assert_eq!(
        Value::Object(compiled.call(&[json!("a"), json!("b")])),
        json!({"pair": ["a", "b"], "tag": "p"})
    );
}

#[test]
fn test_pipeline_builder_and_strict_stage() {
    let pipeline = Shapeline::new()
        .stage(
            Spec::builder()
                .transform("numbers", built_in::identity())
                .transform("count", built_in::length())
                .transform("sum", built_in::sum())
                .build(),
        )
        .stage(
            Spec::builder()
                .literal("type", json!("AVERAGE"))
                .map("average", |s| {
                    json!(s["sum"].as_f64().unwrap_or(0.0) / s["count"].as_f64().unwrap_or(1.0))
                })
                .mode(Mode::Strict)
                .build(),
        );
    assert_eq!(pipeline.run(&numbers()), json!({"type": "AVERAGE", "average": 150.0}));
}

#[test]
fn test_error_policies_across_modes() {
    let broken = || Transform::new(|_| Transform::fail("bad input"));
    for transforms in [TransformsMode::Default, TransformsMode::Prop, TransformsMode::Whole] {
        let spec = Spec::builder()
            .transform("x", broken())
            .transforms(transforms)
            .on_error(ErrorPolicy::handler(|_, field, _| json!(format!("recovered {}", field))))
            .build();
        assert_eq!(
            make_shaper(&Shape::from(spec), &json!({"x": 1})),
            json!({"x": "recovered x"}),
            "transforms mode {}",
            transforms
        );
    }
}

#[test]
fn test_nested_literals_survive_missing_input_key() {
    for mode in ["loose", "strict"] {
        let shape = Shape::from_value(&json!({
            "shapeyMode": mode,
            "meta": {"version": 1},
            "name": {"$transform": "upper"}
        }))
        .expect("shape loads");
        assert_eq!(
            make_shaper(&shape, &json!({"name": "jim"})),
            json!({"name": "JIM", "meta": {"version": 1}}),
            "mode {}",
            mode
        );
    }
}

#[test]
fn test_unreserved_shapey_prefix_is_ordinary_data() {
    let spec = Spec::from_value(&json!({
        "SHAPEYMODE": "strict",
        "shapeyFoo": "bar",
        "name": {"$transform": "upper"}
    }))
    .expect("spec loads");
    assert_eq!(spec.mode(), Mode::Strict);
    assert!(spec.contains_key("shapeyFoo"));
    assert_eq!(
        make_shaper(&Shape::from(spec), &json!({"name": "jim", "shapeyTag": 1})),
        json!({"shapeyFoo": "bar", "name": "JIM"})
    );
}
