use crate::validator::Failure;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DatatypeError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    BadReturnValue(#[from] BadReturnValueError),

    #[error("Could not convert the return value into a datatype value: {0}")]
    #[diagnostic(
        code(guard::convert),
        help("The guarded function must return something serde can serialize into JSON-like data.")
    )]
    Convert(#[from] serde_json::Error),
}

/// A problem with the datatype definition itself. These are programming errors and
/// abort the current call instead of being reported as validation failures.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Malformed datatype definition: {found}")]
    #[diagnostic(
        code(schema::malformed),
        help("A datatype is a primitive name, a list, an object, or a tagged special type.")
    )]
    Malformed { found: String },

    #[error("Unknown primitive type \"{name}\"")]
    #[diagnostic(
        code(schema::unknown_primitive),
        help("Primitive names are int, float, str and bool, optionally prefixed with `nullable`.")
    )]
    UnknownPrimitive { name: String },

    #[error("Unknown special type \"{tag}\"")]
    #[diagnostic(
        code(schema::unknown_special_type),
        help("Recognized `_type_` tags are choice, named, reference and literal.")
    )]
    UnknownSpecialType { tag: String },

    #[error("Special type \"{tag}\" needs a valid \"{field}\" entry")]
    #[diagnostic(
        code(schema::invalid_special_field),
        help("Build special types with the helpers in `datatype::language`.")
    )]
    InvalidSpecialField { tag: String, field: String },

    #[error("Choice has no alternatives")]
    #[diagnostic(
        code(schema::empty_choice),
        help("A choice must list at least one datatype.")
    )]
    EmptyChoice,

    #[error("Named type \"{name}\" is defined more than once")]
    #[diagnostic(
        code(resolver::duplicate_name),
        help("Each named type needs a unique name within one datatype; refer to it elsewhere with a reference.")
    )]
    DuplicateName { name: String },

    #[error("Reference to undefined named type \"{name}\"")]
    #[diagnostic(
        code(resolver::unresolved_reference),
        help("Wrap the referenced datatype with `named(\"{name}\", ...)` somewhere in the same datatype.")
    )]
    UnresolvedReference { name: String },

    #[error("Named type \"{name}\" refers back to itself without any nesting")]
    #[diagnostic(
        code(resolver::reference_cycle),
        help("Put a list, tuple or object between a named type and its own reference, so each step consumes part of the value.")
    )]
    ReferenceCycle { name: String },
}

/// Raised by the return-value guard when a function returns data that does not match
/// its declared datatype.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
#[error("Return value does not match its datatype ({} failure(s))", .failures.len())]
#[diagnostic(
    code(guard::bad_return_value),
    help("Inspect `failures` for the path-qualified mismatches.")
)]
pub struct BadReturnValueError {
    pub failures: Vec<Failure>,
}

impl BadReturnValueError {
    /// The failures as plain messages.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.failures.iter().map(ToString::to_string).collect()
    }
}
