use datatype::language::{choice, literal, named, reference};
use datatype::{coerce, validate, Schema, Value};
use serde_json::json;

fn coerced(definition: serde_json::Value, value: serde_json::Value) -> Value {
    let schema = Schema::parse(&definition).unwrap();
    coerce(&schema, &Value::from(value)).unwrap()
}

#[test]
fn test_coerce_value() {
    assert_eq!(coerced(json!("int"), json!("5")), Value::Int(5));
    assert_eq!(
        coerced(json!(["str"]), json!([1, 2, 3])),
        Value::from(json!(["1", "2", "3"]))
    );
    assert_eq!(
        coerced(json!({"foo": "float"}), json!({"foo": 2})),
        Value::from(json!({"foo": 2.0}))
    );
}

#[test]
fn test_uncoercible_leaf_is_left_alone() {
    assert_eq!(
        coerced(json!(["int"]), json!(["1", "2", "c"])),
        Value::from(json!([1, 2, "c"]))
    );
}

#[test]
fn test_choice_takes_first_successful_alternative() {
    let definition = choice(["int", "bool"]);
    assert_eq!(coerced(definition.clone(), json!("1")), Value::Int(1));
    assert_eq!(coerced(definition, json!("a")), Value::Bool(true));
}

#[test]
fn test_choice_leaves_matching_value_alone() {
    assert_eq!(coerced(choice(["int", "str"]), json!("5")), Value::from("5"));
    assert_eq!(coerced(choice(["str", "int"]), json!(5)), Value::Int(5));
}

#[test]
fn test_choice_without_convertible_alternative() {
    assert_eq!(
        coerced(choice([json!({"a": "int"}), json!("int")]), json!("x")),
        Value::from("x")
    );
}

#[test]
fn test_choice_through_reference() {
    let definition = json!([named("num", "float"), choice([reference("num")])]);
    assert_eq!(
        coerced(definition, json!([1.5, "2.5"])),
        Value::from(json!([1.5, 2.5]))
    );
}

#[test]
fn test_null_and_containers_are_not_coerced() {
    assert_eq!(coerced(json!("nullable int"), json!(null)), Value::Null);
    assert_eq!(coerced(json!("str"), json!([1])), Value::from(json!([1])));
    assert_eq!(coerced(json!(["int"]), json!("12")), Value::from("12"));
}

#[test]
fn test_literal_is_not_coerced() {
    assert_eq!(coerced(literal(5), json!("5")), Value::from("5"));
}

#[test]
fn test_wildcard_and_undeclared_keys() {
    assert_eq!(
        coerced(json!({"_any_": "int"}), json!({"a": "1", "b": "x"})),
        Value::from(json!({"a": 1, "b": "x"}))
    );
    assert_eq!(
        coerced(json!({"a": "int"}), json!({"a": "1", "extra": "2"})),
        Value::from(json!({"a": 1, "extra": "2"}))
    );
}

#[test]
fn test_recursive_schema_coerces_every_level() {
    let definition = named(
        "node",
        json!({"value": "int", "children": [reference("node")]}),
    );
    let value = json!({"value": "1", "children": [{"value": "2", "children": []}]});
    assert_eq!(
        coerced(definition, value),
        Value::from(json!({"value": 1, "children": [{"value": 2, "children": []}]}))
    );
}

#[test]
fn test_coercion_is_idempotent() {
    let cases = [
        (json!("int"), json!("5")),
        (json!("int"), json!("c")),
        (json!("str"), json!(2.0)),
        (json!("bool"), json!(0)),
        (json!(["int"]), json!(["1", "2", "c"])),
        (choice(["int", "bool"]), json!("a")),
        (choice(["int", "bool"]), json!("1")),
        (json!({"a": "float", "optional b": "nullable str"}), json!({"a": "3", "b": 4})),
        (json!(["str", "int"]), json!([1, "2", "3"])),
    ];
    for (definition, value) in cases {
        let once = coerced(definition.clone(), value);
        let twice = coerced(definition, serde_json::Value::from(once.clone()));
        assert_eq!(once, twice);
    }
}

#[test]
fn test_coercion_keeps_failures_of_uncoercible_leaves() {
    let schema = Schema::parse(&json!({"id": "int", "name": "str"})).unwrap();
    let value = Value::from(json!({"id": "abc", "name": 7}));

    let after = coerce(&schema, &value).unwrap();
    assert_eq!(after, Value::from(json!({"id": "abc", "name": "7"})));
    assert_eq!(
        validate(&schema, &after).unwrap(),
        ["id: expected int, got str"]
    );
    assert!(validate(&schema, &value)
        .unwrap()
        .contains(&"id: expected int, got str".to_string()));
}
