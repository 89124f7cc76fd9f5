use crate::error::{DatatypeError, SchemaError};
use crate::language::{self, TYPE_KEY, WILDCARD_KEY};
use crate::value::Value;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value as Json};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Modifier accepted in front of a primitive name (`"nullable str"`).
pub const NULLABLE: &str = "nullable";
/// Modifier accepted in front of an object key (`"optional foo"`).
pub const OPTIONAL: &str = "optional";

/// A parsed datatype definition.
///
/// Built once from its JSON-like authoring form with [`Schema::parse`]; the compound
/// tokens of the authoring form (`"nullable int"`, `"optional key"`) are normalized
/// into flags here and never looked at again.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    Primitive(Primitive),
    /// `["int"]`: a homogeneous list.
    List(Box<Schema>),
    /// `["str", "int"]`: a fixed-arity positional tuple.
    Tuple(Vec<Schema>),
    Object(ObjectSchema),
    Choice(Vec<Schema>),
    Named { name: String, inner: Box<Schema> },
    Reference(String),
    Literal(Value),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Int,
    Float,
    Str,
    Bool,
}

impl PrimitiveKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Int => "int",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Str => "str",
            PrimitiveKind::Bool => "bool",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "int" => Some(PrimitiveKind::Int),
            "float" => Some(PrimitiveKind::Float),
            "str" => Some(PrimitiveKind::Str),
            "bool" => Some(PrimitiveKind::Bool),
            _ => None,
        }
    }

    /// Whether `value` is of this exact runtime kind.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (PrimitiveKind::Int, Value::Int(_))
                | (PrimitiveKind::Float, Value::Float(_))
                | (PrimitiveKind::Str, Value::Str(_))
                | (PrimitiveKind::Bool, Value::Bool(_))
        )
    }
}

impl Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Primitive {
    pub kind: PrimitiveKind,
    pub nullable: bool,
}

impl Primitive {
    #[must_use]
    pub fn new(kind: PrimitiveKind) -> Self {
        Primitive {
            kind,
            nullable: false,
        }
    }

    #[must_use]
    pub fn nullable(kind: PrimitiveKind) -> Self {
        Primitive {
            kind,
            nullable: true,
        }
    }
}

impl FromStr for Primitive {
    type Err = SchemaError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let (name, modifiers) = parse_name_options(token, &[NULLABLE]);
        let kind = PrimitiveKind::from_name(name).ok_or_else(|| SchemaError::UnknownPrimitive {
            name: token.to_string(),
        })?;
        Ok(Primitive {
            kind,
            nullable: modifiers.contains(&NULLABLE),
        })
    }
}

impl Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "{NULLABLE} ")?;
        }
        write!(f, "{}", self.kind)
    }
}

/// One declared object key, with the `optional` modifier already stripped off.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub optional: bool,
    pub schema: Schema,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectSchema {
    /// Declared keys in authoring order.
    pub fields: Vec<Field>,
    /// The `_any_` datatype, applied to every undeclared key.
    pub wildcard: Option<Box<Schema>>,
}

impl ObjectSchema {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The datatype for an actual key. A declared field wins over the wildcard.
    #[must_use]
    pub fn schema_for(&self, key: &str) -> Option<&Schema> {
        self.field(key)
            .map(|f| &f.schema)
            .or(self.wildcard.as_deref())
    }
}

/// Splits leading modifier words off `token`.
///
/// A modifier is only recognized once and never as the last word, so a key that is
/// literally called `optional` still works.
///
/// ```
/// use datatype::schema::parse_name_options;
/// assert_eq!(parse_name_options("optional foo", &["optional"]), ("foo", vec!["optional"]));
/// assert_eq!(parse_name_options("optional", &["optional"]), ("optional", vec![]));
/// ```
#[must_use]
pub fn parse_name_options<'a, 'm>(token: &'a str, possible: &[&'m str]) -> (&'a str, Vec<&'m str>) {
    let mut modifiers: Vec<&'m str> = Vec::new();
    let mut rest = token.trim_start();
    while let Some((word, tail)) = rest.split_once(char::is_whitespace) {
        let tail = tail.trim_start();
        match possible.iter().find(|m| **m == word) {
            Some(modifier) if !tail.is_empty() && !modifiers.contains(modifier) => {
                modifiers.push(*modifier);
                rest = tail;
            }
            _ => break,
        }
    }
    (rest, modifiers)
}

impl Schema {
    /// Parses a datatype definition.
    ///
    /// # Errors
    /// Returns a [`SchemaError`] if any node of the definition is not a recognized shape.
    pub fn parse(definition: &Json) -> Result<Schema, SchemaError> {
        match definition {
            Json::String(token) => token.parse().map(Schema::Primitive),
            Json::Array(items) => {
                let mut schemas = items
                    .iter()
                    .map(Schema::parse)
                    .collect::<Result<Vec<_>, _>>()?;
                if schemas.len() == 1 {
                    Ok(Schema::List(Box::new(schemas.remove(0))))
                } else {
                    Ok(Schema::Tuple(schemas))
                }
            }
            Json::Object(map) if map.contains_key(TYPE_KEY) => Self::parse_special(definition, map),
            Json::Object(map) => Self::parse_object(map).map(Schema::Object),
            other => Err(SchemaError::Malformed {
                found: other.to_string(),
            }),
        }
    }

    /// Parses a definition written as JSON text.
    ///
    /// # Errors
    /// Returns [`DatatypeError::Convert`] for invalid JSON and [`DatatypeError::Schema`]
    /// for a well-formed document that is not a valid definition.
    pub fn from_json_str(source: &str) -> Result<Schema, DatatypeError> {
        let definition: Json = serde_json::from_str(source)?;
        Ok(Schema::parse(&definition)?)
    }

    fn parse_special(definition: &Json, map: &Map<String, Json>) -> Result<Schema, SchemaError> {
        if !map.get(TYPE_KEY).is_some_and(Json::is_string) {
            return Err(SchemaError::Malformed {
                found: definition.to_string(),
            });
        }
        let tag = language::typename(definition);
        let field = |name: &str| {
            map.get(name).ok_or_else(|| SchemaError::InvalidSpecialField {
                tag: tag.to_string(),
                field: name.to_string(),
            })
        };
        let name_field = || -> Result<String, SchemaError> {
            field("name")?
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| SchemaError::InvalidSpecialField {
                    tag: tag.to_string(),
                    field: "name".to_string(),
                })
        };

        match tag {
            "choice" => {
                let choices = field("choices")?.as_array().ok_or_else(|| {
                    SchemaError::InvalidSpecialField {
                        tag: tag.to_string(),
                        field: "choices".to_string(),
                    }
                })?;
                if choices.is_empty() {
                    return Err(SchemaError::EmptyChoice);
                }
                let choices = choices
                    .iter()
                    .map(Schema::parse)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Schema::Choice(choices))
            }
            "named" => Ok(Schema::Named {
                name: name_field()?,
                inner: Box::new(Schema::parse(field("value")?)?),
            }),
            "reference" => Ok(Schema::Reference(name_field()?)),
            "literal" => Ok(Schema::Literal(Value::from(field("value")?.clone()))),
            other => Err(SchemaError::UnknownSpecialType {
                tag: other.to_string(),
            }),
        }
    }

    fn parse_object(map: &Map<String, Json>) -> Result<ObjectSchema, SchemaError> {
        let mut object = ObjectSchema::default();
        for (key, definition) in map {
            let schema = Schema::parse(definition)?;
            if key == WILDCARD_KEY {
                object.wildcard = Some(Box::new(schema));
                continue;
            }
            let (name, modifiers) = parse_name_options(key, &[OPTIONAL]);
            if object.field(name).is_some() {
                return Err(SchemaError::Malformed {
                    found: format!("property \"{name}\" declared twice"),
                });
            }
            object.fields.push(Field {
                name: name.to_string(),
                optional: modifiers.contains(&OPTIONAL),
                schema,
            });
        }
        Ok(object)
    }

    /// Converts back into the JSON-like authoring form.
    #[must_use]
    pub fn to_definition(&self) -> Json {
        match self {
            Schema::Primitive(primitive) => Json::String(primitive.to_string()),
            Schema::List(element) => Json::Array(vec![element.to_definition()]),
            Schema::Tuple(elements) => {
                Json::Array(elements.iter().map(Schema::to_definition).collect())
            }
            Schema::Object(object) => {
                let mut map = Map::new();
                for field in &object.fields {
                    let key = if field.optional {
                        format!("{OPTIONAL} {}", field.name)
                    } else {
                        field.name.clone()
                    };
                    map.insert(key, field.schema.to_definition());
                }
                if let Some(wildcard) = &object.wildcard {
                    map.insert(WILDCARD_KEY.to_string(), wildcard.to_definition());
                }
                Json::Object(map)
            }
            Schema::Choice(choices) => language::choice(choices.iter().map(Schema::to_definition)),
            Schema::Named { name, inner } => language::named(name, inner.to_definition()),
            Schema::Reference(name) => language::reference(name),
            Schema::Literal(value) => language::literal(Json::from(value.clone())),
        }
    }

    /// The definition as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// The definition as YAML.
    ///
    /// # Errors
    /// Returns a `serde_yaml::Error` if serialization fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

impl TryFrom<&Json> for Schema {
    type Error = SchemaError;

    fn try_from(definition: &Json) -> Result<Self, Self::Error> {
        Schema::parse(definition)
    }
}

impl TryFrom<Json> for Schema {
    type Error = SchemaError;

    fn try_from(definition: Json) -> Result<Self, Self::Error> {
        Schema::parse(&definition)
    }
}

impl Serialize for Schema {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_definition().serialize(serializer)
    }
}

/// Primitives render as their bare token, everything else as compact JSON.
impl Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::Primitive(primitive) => write!(f, "{primitive}"),
            other => write!(f, "{}", other.to_definition()),
        }
    }
}
