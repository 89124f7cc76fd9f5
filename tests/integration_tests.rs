use datatype::language::{choice, literal, named, reference};
use datatype::{coerce, validate, ResolvedSchema, Schema, Value};
use serde_json::json;

fn api_response() -> Schema {
    Schema::parse(&json!({
        "status": choice([literal("ok"), literal("error")]),
        "optional message": "nullable str",
        "total": "int",
        "items": [{
            "id": "int",
            "price": "float",
            "tags": ["str"],
            "optional dims": ["float", "float"],
        }],
        "meta": {"_any_": "str"},
    }))
    .unwrap()
}

#[test]
fn test_wire_payload_coerce_then_validate() {
    let payload = Value::from(json!({
        "status": "ok",
        "message": null,
        "total": "2",
        "items": [
            {"id": "1", "price": "9.5", "tags": ["a", 2]},
            {"id": 2, "price": 3, "tags": [], "dims": ["1", 2.5]},
        ],
        "meta": {"source": "cache", "age": 30},
    }));

    let schema = api_response();
    assert_eq!(
        validate(&schema, &payload).unwrap(),
        [
            "total: expected int, got str",
            "items[0].id: expected int, got str",
            "items[0].price: expected float, got str",
            "items[0].tags[1]: expected str, got int",
            "items[1].price: expected float, got int",
            "items[1].dims[0]: expected float, got str",
            "meta.age: expected str, got int",
        ]
    );

    let coerced = coerce(&schema, &payload).unwrap();
    assert_eq!(
        coerced,
        Value::from(json!({
            "status": "ok",
            "message": null,
            "total": 2,
            "items": [
                {"id": 1, "price": 9.5, "tags": ["a", "2"]},
                {"id": 2, "price": 3.0, "tags": [], "dims": [1.0, 2.5]},
            ],
            "meta": {"source": "cache", "age": "30"},
        }))
    );
    assert!(validate(&schema, &coerced).unwrap().is_empty());
}

#[test]
fn test_literal_choice_failure() {
    let payload = Value::from(json!({"status": "pending", "total": 0, "items": [], "meta": {}}));
    assert_eq!(
        validate(&api_response(), &payload).unwrap(),
        ["status: \"pending\" is none of expected {\"_type_\":\"literal\",\"value\":\"ok\"} or {\"_type_\":\"literal\",\"value\":\"error\"}"]
    );
}

#[test]
fn test_resolved_schema_is_reusable() {
    let schema = Schema::parse(&named(
        "expr",
        choice([
            json!("int"),
            json!({"op": "str", "args": [reference("expr")]}),
        ]),
    ))
    .unwrap();
    let resolved = ResolvedSchema::new(&schema).unwrap();

    let good = Value::from(json!({"op": "add", "args": [1, {"op": "neg", "args": [2]}]}));
    let bad = Value::from(json!({"op": "add", "args": [1, {"op": "neg"}]}));

    assert!(resolved.is_valid(&good).unwrap());
    assert!(resolved.is_valid(&Value::Int(3)).unwrap());
    assert_eq!(resolved.validate(&bad).unwrap().len(), 1);
}

#[test]
fn test_schema_from_json_text_and_rendering() {
    let schema = Schema::from_json_str(r#"{"name": "str", "optional age": "nullable int"}"#).unwrap();
    assert_eq!(
        schema.to_json().unwrap(),
        "{\n  \"name\": \"str\",\n  \"optional age\": \"nullable int\"\n}"
    );
    assert_eq!(schema.to_yaml().unwrap(), "name: str\noptional age: nullable int\n");
}

#[test]
fn test_value_serializes_like_json() {
    let value = Value::from(json!({"a": [1, 2.5, "x", null, true]}));
    assert_eq!(
        serde_json::to_string(&value).unwrap(),
        r#"{"a":[1,2.5,"x",null,true]}"#
    );
}
