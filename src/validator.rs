use crate::error::SchemaError;
use crate::schema::{ObjectSchema, Schema};
use crate::value::Value;
use crate::walker::{Node, Visit, Visitor, Walker};
use indexmap::IndexMap;
use std::fmt::{self, Display};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FailureKind {
    #[error("unexpected null for non-nullable type")]
    UnexpectedNull,
    #[error("expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
    #[error("missing required value at index {0}")]
    MissingIndex(usize),
    #[error("unexpected value at index {0}")]
    UnexpectedIndex(usize),
    #[error("missing required property: \"{0}\"")]
    MissingProperty(String),
    #[error("unexpected property \"{0}\"")]
    UnexpectedProperty(String),
    #[error("{value} is none of expected {choices}")]
    NoneOfChoices { value: String, choices: String },
    #[error("expected literal value \"{expected}\", got \"{actual}\"")]
    LiteralMismatch { expected: String, actual: String },
}

/// A single validation diagnostic, prefixed with its path unless it is at the root.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub path: String,
    pub kind: FailureKind,
}

impl Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.path, self.kind)
        }
    }
}

/// Renders alternatives as `a`, `a or b`, or `a, b, or c`.
#[must_use]
pub fn render_choices(choices: &[Schema]) -> String {
    let names: Vec<String> = choices.iter().map(ToString::to_string).collect();
    match names.as_slice() {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{first} or {second}"),
        [init @ .., last] => format!("{}, or {last}", init.join(", ")),
    }
}

/// Visitor collecting a [`Failure`] for every mismatch it sees.
#[derive(Debug, Default)]
pub struct Validator {
    failures: Vec<Failure>,
}

impl Validator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    #[must_use]
    pub fn into_failures(self) -> Vec<Failure> {
        self.failures
    }

    fn fail(&mut self, path: &str, kind: FailureKind) {
        self.failures.push(Failure {
            path: path.to_string(),
            kind,
        });
    }

    fn check_tuple(&mut self, path: &str, arity: usize, items: &[Value]) {
        for i in items.len()..arity {
            self.fail(path, FailureKind::MissingIndex(i));
        }
        for i in arity..items.len() {
            self.fail(path, FailureKind::UnexpectedIndex(i));
        }
    }

    fn check_object(&mut self, path: &str, object: &ObjectSchema, map: &IndexMap<String, Value>) {
        for field in &object.fields {
            if !field.optional && !map.contains_key(&field.name) {
                self.fail(path, FailureKind::MissingProperty(field.name.clone()));
            }
        }
        if object.wildcard.is_none() {
            for key in map.keys() {
                if object.field(key).is_none() {
                    self.fail(path, FailureKind::UnexpectedProperty(key.clone()));
                }
            }
        }
    }
}

impl Visitor for Validator {
    fn visit(&mut self, walker: &Walker<'_>, node: &Node<'_>) -> Result<Visit, SchemaError> {
        let Node {
            path,
            schema,
            value,
            options,
        } = *node;
        // Undeclared keys are reported by their parent object.
        let Some(schema) = schema else {
            return Ok(Visit::Continue);
        };

        match schema {
            Schema::Choice(choices) => {
                if !satisfies_any(walker, choices, value)? {
                    self.fail(
                        path,
                        FailureKind::NoneOfChoices {
                            value: value.to_string(),
                            choices: render_choices(choices),
                        },
                    );
                }
            }
            Schema::Literal(expected) => {
                if value != expected {
                    self.fail(
                        path,
                        FailureKind::LiteralMismatch {
                            expected: expected.to_plain_string(),
                            actual: value.to_plain_string(),
                        },
                    );
                }
            }
            _ if value.is_null() => {
                if !options.nullable {
                    self.fail(path, FailureKind::UnexpectedNull);
                }
            }
            Schema::Primitive(primitive) => {
                if !primitive.kind.accepts(value) {
                    self.fail(
                        path,
                        FailureKind::TypeMismatch {
                            expected: primitive.kind.name(),
                            actual: value.kind_name(),
                        },
                    );
                }
            }
            Schema::List(_) | Schema::Tuple(_) => match (schema, value) {
                (Schema::Tuple(elements), Value::List(items)) => {
                    self.check_tuple(path, elements.len(), items);
                }
                (_, Value::List(_)) => {}
                _ => self.fail(
                    path,
                    FailureKind::TypeMismatch {
                        expected: "list",
                        actual: value.kind_name(),
                    },
                ),
            },
            Schema::Object(object) => match value {
                Value::Object(map) => self.check_object(path, object, map),
                _ => self.fail(
                    path,
                    FailureKind::TypeMismatch {
                        expected: "dict",
                        actual: value.kind_name(),
                    },
                ),
            },
            // Resolved by the walker before any visit.
            Schema::Named { .. } | Schema::Reference(_) => {}
        }
        Ok(Visit::Continue)
    }
}

/// Whether `value` validates under `schema` without a single failure.
pub(crate) fn satisfies(walker: &Walker<'_>, schema: &Schema, value: &Value) -> Result<bool, SchemaError> {
    let mut validator = Validator::new();
    walker.walk(schema, value, &mut validator)?;
    Ok(validator.failures.is_empty())
}

pub(crate) fn satisfies_any(
    walker: &Walker<'_>,
    choices: &[Schema],
    value: &Value,
) -> Result<bool, SchemaError> {
    for choice in choices {
        if satisfies(walker, choice, value)? {
            return Ok(true);
        }
    }
    Ok(false)
}
