use crate::error::SchemaError;
use crate::schema::{Field, ObjectSchema, Schema};
use crate::walker::Walker;
use std::collections::{HashMap, HashSet};

/// Table of named types, filled by stripping the `named` wrappers out of a datatype.
/// References are looked up here by name instead of forming a cyclic structure.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct NamedTypes {
    types: HashMap<String, Schema>,
}

impl NamedTypes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.types.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Follows references until a concrete datatype is reached.
    ///
    /// # Errors
    /// [`SchemaError::UnresolvedReference`] for an unknown name and
    /// [`SchemaError::ReferenceCycle`] when references only lead back to each other.
    pub fn resolve<'a>(&'a self, mut schema: &'a Schema) -> Result<&'a Schema, SchemaError> {
        let mut hops = 0;
        while let Schema::Reference(name) = schema {
            if hops > self.types.len() {
                return Err(SchemaError::ReferenceCycle { name: name.clone() });
            }
            schema = self
                .get(name)
                .ok_or_else(|| SchemaError::UnresolvedReference { name: name.clone() })?;
            hops += 1;
        }
        Ok(schema)
    }
}

/// Strips `named` wrappers out of a datatype, collecting them into one flat table.
pub struct Resolver {
    pub named_types: NamedTypes,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver {
    pub fn new() -> Self {
        Resolver {
            named_types: NamedTypes::new(),
        }
    }

    /// Rewrites `schema` with every `named` wrapper replaced by its body, registering
    /// each body under its name. Named types nested inside other named types are
    /// captured too.
    ///
    /// # Errors
    /// Returns [`SchemaError::DuplicateName`] if a name is registered twice.
    pub fn extract(&mut self, schema: Schema) -> Result<Schema, SchemaError> {
        match schema {
            Schema::Named { name, inner } => {
                let inner = self.extract(*inner)?;
                if self.named_types.contains(&name) {
                    return Err(SchemaError::DuplicateName { name });
                }
                log::debug!("Registered named type \"{name}\"");
                self.named_types.types.insert(name, inner.clone());
                Ok(inner)
            }
            Schema::List(element) => Ok(Schema::List(Box::new(self.extract(*element)?))),
            Schema::Tuple(elements) => Ok(Schema::Tuple(self.extract_all(elements)?)),
            Schema::Choice(choices) => Ok(Schema::Choice(self.extract_all(choices)?)),
            Schema::Object(object) => {
                let mut fields = Vec::with_capacity(object.fields.len());
                for field in object.fields {
                    fields.push(Field {
                        schema: self.extract(field.schema)?,
                        ..field
                    });
                }
                let wildcard = match object.wildcard {
                    Some(wildcard) => Some(Box::new(self.extract(*wildcard)?)),
                    None => None,
                };
                Ok(Schema::Object(ObjectSchema { fields, wildcard }))
            }
            leaf @ (Schema::Primitive(_) | Schema::Reference(_) | Schema::Literal(_)) => Ok(leaf),
        }
    }

    fn extract_all(&mut self, schemas: Vec<Schema>) -> Result<Vec<Schema>, SchemaError> {
        schemas.into_iter().map(|s| self.extract(s)).collect()
    }

    /// Checks that every reference in `schema` and in the table resolves, and that
    /// no named type reaches itself without a container in between.
    fn verify(&self, schema: &Schema) -> Result<(), SchemaError> {
        verify_references(schema, &self.named_types)?;
        for body in self.named_types.types.values() {
            verify_references(body, &self.named_types)?;
        }

        let mut names: Vec<&str> = self.named_types.names().collect();
        names.sort_unstable();
        let mut cleared = HashSet::new();
        for name in names {
            let mut stack = vec![name];
            self.verify_nesting(name, &mut stack, &mut cleared)?;
        }
        Ok(())
    }

    /// Follows the references `name` reaches without consuming any part of a value.
    /// Meeting a name that is already on `stack` means the walker would loop.
    fn verify_nesting<'a>(
        &'a self,
        name: &'a str,
        stack: &mut Vec<&'a str>,
        cleared: &mut HashSet<&'a str>,
    ) -> Result<(), SchemaError> {
        if cleared.contains(name) {
            return Ok(());
        }
        let mut reached = Vec::new();
        if let Some(body) = self.named_types.get(name) {
            unnested_references(body, &mut reached);
        }
        for next in reached {
            if stack.contains(&next) {
                let cycle = stack.join(" -> ");
                log::debug!("Rejected reference cycle {cycle} -> {next}");
                return Err(SchemaError::ReferenceCycle {
                    name: next.to_string(),
                });
            }
            stack.push(next);
            self.verify_nesting(next, stack, cleared)?;
            stack.pop();
        }
        cleared.insert(name);
        Ok(())
    }
}

fn verify_references(schema: &Schema, named_types: &NamedTypes) -> Result<(), SchemaError> {
    match schema {
        Schema::Reference(_) => named_types.resolve(schema).map(|_| ()),
        Schema::List(element) => verify_references(element, named_types),
        Schema::Tuple(schemas) | Schema::Choice(schemas) => schemas
            .iter()
            .try_for_each(|s| verify_references(s, named_types)),
        Schema::Object(object) => {
            for field in &object.fields {
                verify_references(&field.schema, named_types)?;
            }
            match &object.wildcard {
                Some(wildcard) => verify_references(wildcard, named_types),
                None => Ok(()),
            }
        }
        Schema::Named { inner, .. } => verify_references(inner, named_types),
        Schema::Primitive(_) | Schema::Literal(_) => Ok(()),
    }
}

/// References reachable from `schema` through choices alone. Lists, tuples and
/// objects stop the search because walking them consumes part of the value.
fn unnested_references<'a>(schema: &'a Schema, found: &mut Vec<&'a str>) {
    match schema {
        Schema::Reference(name) => found.push(name),
        Schema::Choice(choices) => {
            for choice in choices {
                unnested_references(choice, found);
            }
        }
        Schema::Named { inner, .. } => unnested_references(inner, found),
        Schema::Primitive(_)
        | Schema::List(_)
        | Schema::Tuple(_)
        | Schema::Object(_)
        | Schema::Literal(_) => {}
    }
}

/// Strips `named` wrappers out of `schema`, returning the name table and the
/// rewritten datatype.
///
/// # Errors
/// Returns [`SchemaError::DuplicateName`] if a name is registered twice.
pub fn extract_named(schema: Schema) -> Result<(NamedTypes, Schema), SchemaError> {
    let mut resolver = Resolver::new();
    let root = resolver.extract(schema)?;
    Ok((resolver.named_types, root))
}

/// A datatype prepared for traversal: named types extracted and every reference
/// checked. Build it once and reuse it to skip the preprocessing on repeated calls.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSchema {
    named_types: NamedTypes,
    root: Schema,
}

impl ResolvedSchema {
    /// # Errors
    /// Returns a [`SchemaError`] for duplicate names, unresolved references or
    /// reference cycles.
    pub fn new(schema: &Schema) -> Result<Self, SchemaError> {
        let mut resolver = Resolver::new();
        let root = resolver.extract(schema.clone())?;
        resolver.verify(&root)?;
        Ok(ResolvedSchema {
            named_types: resolver.named_types,
            root,
        })
    }

    #[must_use]
    pub fn root(&self) -> &Schema {
        &self.root
    }

    #[must_use]
    pub fn named_types(&self) -> &NamedTypes {
        &self.named_types
    }

    #[must_use]
    pub fn walker(&self) -> Walker<'_> {
        Walker::new(&self.named_types)
    }
}
