//! Return-value guard: checks what a function returns against a datatype.

use crate::docgen;
use crate::error::{BadReturnValueError, DatatypeError, SchemaError};
use crate::resolver::ResolvedSchema;
use crate::schema::Schema;
use crate::validator::FailureKind;
use crate::value::Value;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Any failure is an error.
    #[default]
    Strict,
    /// Failures that are only unexpected properties are logged as warnings.
    Lenient,
}

#[derive(Debug, Clone)]
pub struct Returns {
    definition: Schema,
    resolved: ResolvedSchema,
    mode: Mode,
}

/// Builds a strict guard from a JSON-like datatype definition.
///
/// ```
/// use datatype::returns;
/// use serde_json::json;
///
/// let guard = returns(&json!({"foo": "int"})).unwrap();
/// let get = guard.wrap(|n: i64| json!({"foo": n}));
/// assert!(get(5).is_ok());
/// ```
///
/// # Errors
/// Returns a [`SchemaError`] if the definition is not a valid datatype.
pub fn returns(definition: &serde_json::Value) -> Result<Returns, SchemaError> {
    Returns::new(&Schema::parse(definition)?)
}

impl Returns {
    /// # Errors
    /// Returns a [`SchemaError`] if the datatype cannot be resolved.
    pub fn new(schema: &Schema) -> Result<Self, SchemaError> {
        Ok(Returns {
            definition: schema.clone(),
            resolved: ResolvedSchema::new(schema)?,
            mode: Mode::Strict,
        })
    }

    #[must_use]
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn lenient(self) -> Self {
        self.mode(Mode::Lenient)
    }

    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.definition
    }

    /// Passes `ret` through if it matches the datatype.
    ///
    /// # Errors
    /// [`DatatypeError::BadReturnValue`] carrying every failure, unless the guard is
    /// lenient and all failures are unexpected properties.
    pub fn check<T: Serialize>(&self, ret: T) -> Result<T, DatatypeError> {
        let value = Value::from(serde_json::to_value(&ret)?);
        let failures = self.resolved.failures(&value)?;
        if failures.is_empty() {
            return Ok(ret);
        }

        let tolerated = self.mode == Mode::Lenient
            && failures
                .iter()
                .all(|f| matches!(f.kind, FailureKind::UnexpectedProperty(_)));
        if tolerated {
            for failure in &failures {
                log::warn!("Return value: {failure}");
            }
            return Ok(ret);
        }
        Err(BadReturnValueError { failures }.into())
    }

    /// Wraps `f` so that every return value goes through [`Returns::check`].
    pub fn wrap<A, T, F>(self, f: F) -> impl Fn(A) -> Result<T, DatatypeError>
    where
        F: Fn(A) -> T,
        T: Serialize,
    {
        move |args| self.check(f(args))
    }

    /// Appends the datatype to a function's documentation text.
    #[must_use]
    pub fn document(&self, doc: &str) -> String {
        docgen::add_docs(doc, &self.definition)
    }
}
