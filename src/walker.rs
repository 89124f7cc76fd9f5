//! The traversal shared by validation and coercion.
//!
//! A [`Walker`] pairs datatype nodes with value nodes, hands every pair to a
//! [`Visitor`], and rebuilds the value from the visitor's replacements. It never
//! judges a mismatch itself: a node whose value has the wrong shape is visited and
//! then not descended into. Object keys with neither a declaration nor a wildcard
//! are still visited, with no datatype attached.

use crate::error::SchemaError;
use crate::resolver::NamedTypes;
use crate::schema::{ObjectSchema, Schema};
use crate::utils::{join_index, join_key};
use crate::value::Value;
use indexmap::IndexMap;

/// Modifiers active for the node being visited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// The primitive was declared `nullable`.
    pub nullable: bool,
    /// The value sits under an object key declared `optional`.
    pub optional: bool,
}

/// One datatype/value pair handed to a [`Visitor`].
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    /// `""` at the root, then `key`, `key.sub`, `key[0]`, ...
    pub path: &'a str,
    /// Never a reference or a named wrapper; those are resolved before the visit.
    /// `None` for an undeclared object key when the object has no wildcard.
    pub schema: Option<&'a Schema>,
    pub value: &'a Value,
    pub options: Options,
}

/// What a visitor wants done with the visited value.
#[derive(Debug, Clone, PartialEq)]
pub enum Visit {
    Continue,
    /// Use this value instead, both for the rest of the traversal below this node
    /// and in the returned value.
    Replace(Value),
}

pub trait Visitor {
    /// Called once per node, parents before children.
    ///
    /// # Errors
    /// A [`SchemaError`] aborts the whole walk.
    fn visit(&mut self, walker: &Walker<'_>, node: &Node<'_>) -> Result<Visit, SchemaError>;
}

/// A visitor built from a closure. See [`from_fn`].
pub struct FromFn<F>(F);

/// Wraps a closure as a [`Visitor`].
///
/// ```
/// use datatype::walker::{from_fn, Visit};
/// use datatype::{walk, Schema, Value};
/// use serde_json::json;
///
/// let schema = Schema::parse(&json!(["int"])).unwrap();
/// let mut paths = Vec::new();
/// walk(&schema, &Value::from(vec![1_i64, 2]), &mut from_fn(|node| {
///     paths.push(node.path.to_string());
///     Visit::Continue
/// }))
/// .unwrap();
/// assert_eq!(paths, ["", "[0]", "[1]"]);
/// ```
pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: FnMut(&Node<'_>) -> Visit,
{
    FromFn(f)
}

impl<F> Visitor for FromFn<F>
where
    F: FnMut(&Node<'_>) -> Visit,
{
    fn visit(&mut self, _walker: &Walker<'_>, node: &Node<'_>) -> Result<Visit, SchemaError> {
        Ok((self.0)(node))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Walker<'t> {
    named_types: &'t NamedTypes,
}

impl<'t> Walker<'t> {
    #[must_use]
    pub fn new(named_types: &'t NamedTypes) -> Self {
        Walker { named_types }
    }

    #[must_use]
    pub fn named_types(&self) -> &'t NamedTypes {
        self.named_types
    }

    /// Walks `value` against `schema` from the root and returns the rebuilt value.
    ///
    /// # Errors
    /// Returns a [`SchemaError`] for unresolvable references or when the visitor fails.
    pub fn walk<V>(&self, schema: &Schema, value: &Value, visitor: &mut V) -> Result<Value, SchemaError>
    where
        V: Visitor + ?Sized,
    {
        self.walk_node("", schema, value, Options::default(), visitor)
    }

    fn walk_node<V>(
        &self,
        path: &str,
        schema: &Schema,
        value: &Value,
        mut options: Options,
        visitor: &mut V,
    ) -> Result<Value, SchemaError>
    where
        V: Visitor + ?Sized,
    {
        let schema = self.named_types.resolve(schema)?;
        let schema = match schema {
            // Only reachable when walking a datatype that skipped extraction.
            Schema::Named { inner, .. } => return self.walk_node(path, inner, value, options, visitor),
            Schema::Primitive(primitive) => {
                options.nullable |= primitive.nullable;
                schema
            }
            other => other,
        };
        log::trace!("Visiting `{path}` against {schema}");

        let node = Node {
            path,
            schema: Some(schema),
            value,
            options,
        };
        let replaced;
        let value = match visitor.visit(self, &node)? {
            Visit::Continue => value,
            Visit::Replace(new_value) => {
                replaced = new_value;
                &replaced
            }
        };

        match (schema, value) {
            (Schema::List(element), Value::List(items)) => {
                let mut walked = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    walked.push(self.walk_node(
                        &join_index(path, i),
                        element,
                        item,
                        Options::default(),
                        visitor,
                    )?);
                }
                Ok(Value::List(walked))
            }
            (Schema::Tuple(elements), Value::List(items)) => {
                let mut walked = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    match elements.get(i) {
                        Some(element) => walked.push(self.walk_node(
                            &join_index(path, i),
                            element,
                            item,
                            Options::default(),
                            visitor,
                        )?),
                        // Extra positions have no datatype; keep them as they are.
                        None => walked.push(item.clone()),
                    }
                }
                Ok(Value::List(walked))
            }
            (Schema::Object(object), Value::Object(map)) => self
                .walk_object(path, object, map, visitor)
                .map(Value::Object),
            _ => Ok(value.clone()),
        }
    }

    /// Visits every key of `map` in the value's own order, against its declared
    /// datatype, the wildcard, or no datatype at all.
    fn walk_object<V>(
        &self,
        path: &str,
        object: &ObjectSchema,
        map: &IndexMap<String, Value>,
        visitor: &mut V,
    ) -> Result<IndexMap<String, Value>, SchemaError>
    where
        V: Visitor + ?Sized,
    {
        let mut walked = IndexMap::with_capacity(map.len());
        for (key, value) in map {
            let path = join_key(path, key);
            let value = match object.field(key) {
                Some(field) => {
                    let options = Options {
                        optional: field.optional,
                        ..Options::default()
                    };
                    self.walk_node(&path, &field.schema, value, options, visitor)?
                }
                None => match object.wildcard.as_deref() {
                    Some(wildcard) => {
                        self.walk_node(&path, wildcard, value, Options::default(), visitor)?
                    }
                    None => self.walk_undeclared(&path, value, visitor)?,
                },
            };
            walked.insert(key.clone(), value);
        }
        Ok(walked)
    }

    /// Visits a value that has no datatype. Nothing below it is visited.
    fn walk_undeclared<V>(&self, path: &str, value: &Value, visitor: &mut V) -> Result<Value, SchemaError>
    where
        V: Visitor + ?Sized,
    {
        log::trace!("Visiting `{path}` without a datatype");
        let node = Node {
            path,
            schema: None,
            value,
            options: Options::default(),
        };
        Ok(match visitor.visit(self, &node)? {
            Visit::Continue => value.clone(),
            Visit::Replace(new_value) => new_value,
        })
    }
}
