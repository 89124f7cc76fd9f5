//! Describe the shape of semi-structured data with a small recursive schema
//! language, report every mismatch with a path-qualified message, and coerce leaf
//! values toward their declared primitives.
//!
//! ```
//! use datatype::{coerce, validate, Schema, Value};
//! use serde_json::json;
//!
//! let schema = Schema::parse(&json!({"id": "int", "optional tags": ["str"]})).unwrap();
//! let value = Value::from(json!({"id": "5"}));
//!
//! assert_eq!(validate(&schema, &value).unwrap(), ["id: expected int, got str"]);
//! assert_eq!(coerce(&schema, &value).unwrap(), Value::from(json!({"id": 5})));
//! ```

pub mod api;
pub mod coercion;
pub mod docgen;
pub mod error;
pub mod guard;
pub mod language;
pub mod resolver;
pub mod schema;
pub mod utils;
pub mod validator;
pub mod value;
pub mod walker;

pub use api::{coerce, failures, is_valid, validate, walk};
pub use error::{BadReturnValueError, DatatypeError, SchemaError};
pub use guard::{returns, Mode, Returns};
pub use resolver::{extract_named, NamedTypes, ResolvedSchema};
pub use schema::{Primitive, PrimitiveKind, Schema};
pub use validator::{Failure, FailureKind};
pub use value::Value;
