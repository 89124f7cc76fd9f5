use crate::coercion::Coercer;
use crate::error::SchemaError;
use crate::resolver::ResolvedSchema;
use crate::schema::Schema;
use crate::validator::{Failure, Validator};
use crate::value::Value;
use crate::walker::Visitor;

impl ResolvedSchema {
    /// Walks `value` with an arbitrary visitor. See [`crate::walker`].
    ///
    /// # Errors
    /// Returns a [`SchemaError`] if the visitor aborts the walk.
    pub fn walk<V>(&self, value: &Value, visitor: &mut V) -> Result<Value, SchemaError>
    where
        V: Visitor + ?Sized,
    {
        self.walker().walk(self.root(), value, visitor)
    }

    /// Every mismatch between the datatype and `value`, in traversal order.
    ///
    /// # Errors
    /// Returns a [`SchemaError`] if the datatype itself is broken.
    pub fn failures(&self, value: &Value) -> Result<Vec<Failure>, SchemaError> {
        let mut validator = Validator::new();
        self.walk(value, &mut validator)?;
        Ok(validator.into_failures())
    }

    /// The failures as path-prefixed messages; empty means valid.
    ///
    /// # Errors
    /// Returns a [`SchemaError`] if the datatype itself is broken.
    pub fn validate(&self, value: &Value) -> Result<Vec<String>, SchemaError> {
        Ok(self
            .failures(value)?
            .iter()
            .map(ToString::to_string)
            .collect())
    }

    /// # Errors
    /// Returns a [`SchemaError`] if the datatype itself is broken.
    pub fn is_valid(&self, value: &Value) -> Result<bool, SchemaError> {
        Ok(self.failures(value)?.is_empty())
    }

    /// Best-effort conversion of every leaf toward its declared primitive.
    ///
    /// # Errors
    /// Returns a [`SchemaError`] if the datatype itself is broken. Values that cannot
    /// be converted are never an error; they are returned unchanged.
    pub fn coerce(&self, value: &Value) -> Result<Value, SchemaError> {
        self.walk(value, &mut Coercer)
    }
}

/// Walks `value` against `schema` with a custom visitor.
///
/// # Errors
/// Returns a [`SchemaError`] if the datatype is broken or the visitor aborts.
pub fn walk<V>(schema: &Schema, value: &Value, visitor: &mut V) -> Result<Value, SchemaError>
where
    V: Visitor + ?Sized,
{
    ResolvedSchema::new(schema)?.walk(value, visitor)
}

/// Structured validation failures for `value`.
///
/// # Errors
/// Returns a [`SchemaError`] if the datatype is broken.
pub fn failures(schema: &Schema, value: &Value) -> Result<Vec<Failure>, SchemaError> {
    ResolvedSchema::new(schema)?.failures(value)
}

/// Validates `value` against `schema`, returning one message per mismatch.
///
/// ```
/// use datatype::{validate, Schema, Value};
/// use serde_json::json;
///
/// let schema = Schema::parse(&json!({"foo": "int"})).unwrap();
/// let value = Value::from(json!({"foo": "bar"}));
/// assert_eq!(validate(&schema, &value).unwrap(), ["foo: expected int, got str"]);
/// ```
///
/// # Errors
/// Returns a [`SchemaError`] if the datatype is broken. Mismatches in the data are
/// never errors.
pub fn validate(schema: &Schema, value: &Value) -> Result<Vec<String>, SchemaError> {
    ResolvedSchema::new(schema)?.validate(value)
}

/// # Errors
/// Returns a [`SchemaError`] if the datatype is broken.
pub fn is_valid(schema: &Schema, value: &Value) -> Result<bool, SchemaError> {
    ResolvedSchema::new(schema)?.is_valid(value)
}

/// Returns `value` with every convertible leaf converted to its declared primitive.
///
/// # Errors
/// Returns a [`SchemaError`] if the datatype is broken.
pub fn coerce(schema: &Schema, value: &Value) -> Result<Value, SchemaError> {
    ResolvedSchema::new(schema)?.coerce(value)
}

#[cfg(test)]
mod tests {
    use crate::{coerce, is_valid, validate, Schema, Value};
    use serde_json::json;

    fn schema(definition: serde_json::Value) -> Schema {
        Schema::parse(&definition).unwrap()
    }

    #[test]
    fn test_is_valid_agrees_with_validate() {
        let cases = [
            (json!("int"), json!(5)),
            (json!("int"), json!("5")),
            (json!({"foo": "int"}), json!({})),
            (json!(["str", "int"]), json!(["a", 1])),
            (json!({"_any_": "int"}), json!({"a": "x"})),
        ];
        for (definition, value) in cases {
            let schema = schema(definition);
            let value = Value::from(value);
            assert_eq!(
                is_valid(&schema, &value).unwrap(),
                validate(&schema, &value).unwrap().is_empty()
            );
        }
    }

    #[test]
    fn test_coerce_then_validate_is_clean() {
        let schema = schema(json!({"id": "int", "ratio": "float", "tags": ["str"]}));
        let value = Value::from(json!({"id": "7", "ratio": 1, "tags": [1, true]}));

        let coerced = coerce(&schema, &value).unwrap();
        assert_eq!(
            coerced,
            Value::from(json!({"id": 7, "ratio": 1.0, "tags": ["1", "true"]}))
        );
        assert!(validate(&schema, &coerced).unwrap().is_empty());
    }
}
