//! Helpers for authoring datatype definitions.
//!
//! Definitions are plain JSON-like data. Special types are objects carrying a
//! `_type_` tag; these helpers build them so callers never spell the tags by hand.
//!
//! ```
//! use datatype::language::{choice, named, reference};
//! use serde_json::json;
//!
//! let tree = named("node", json!({
//!     "value": "int",
//!     "children": [reference("node")],
//! }));
//! assert_eq!(choice(["str", "int"]), json!({"_type_": "choice", "choices": ["str", "int"]}));
//! # let _ = tree;
//! ```

use serde_json::{json, Map, Value as Json};

/// Tag key marking a special type.
pub const TYPE_KEY: &str = "_type_";
/// Object key whose datatype applies to every undeclared key.
pub const WILDCARD_KEY: &str = "_any_";

/// Returns the type name of a definition: its `_type_` tag, or `"type"` for
/// primitives, lists and plain objects.
#[must_use]
pub fn typename(definition: &Json) -> &str {
    const DEFAULT: &str = "type";
    match definition {
        Json::Object(map) => map.get(TYPE_KEY).and_then(Json::as_str).unwrap_or(DEFAULT),
        _ => DEFAULT,
    }
}

/// Builds a special type object from the tag and its fields.
#[must_use]
pub fn special_type<I, K>(typename: &str, fields: I) -> Json
where
    I: IntoIterator<Item = (K, Json)>,
    K: Into<String>,
{
    let mut map = Map::new();
    map.insert(TYPE_KEY.to_string(), Json::String(typename.to_string()));
    for (key, value) in fields {
        let key: String = key.into();
        if key != TYPE_KEY {
            map.insert(key, value);
        }
    }
    Json::Object(map)
}

/// A value matching at least one of `choices`.
pub fn choice<I, T>(choices: I) -> Json
where
    I: IntoIterator<Item = T>,
    T: Into<Json>,
{
    let choices: Vec<Json> = choices.into_iter().map(Into::into).collect();
    special_type("choice", [("choices", Json::Array(choices))])
}

/// Registers `value` under `name` so that [`reference`] can point back at it.
pub fn named(name: &str, value: impl Into<Json>) -> Json {
    special_type("named", [("name", json!(name)), ("value", value.into())])
}

#[must_use]
pub fn reference(name: &str) -> Json {
    special_type("reference", [("name", json!(name))])
}

/// A value that must equal `value` exactly.
pub fn literal(value: impl Into<Json>) -> Json {
    special_type("literal", [("value", value.into())])
}
