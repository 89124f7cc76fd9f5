//! Best-effort coercion of leaf values toward their declared primitive.
//!
//! Conversions that fail leave the value exactly as it was, so a validation pass
//! afterwards reports the precise mismatch.

use crate::error::SchemaError;
use crate::schema::{PrimitiveKind, Schema};
use crate::validator::satisfies_any;
use crate::value::Value;
use crate::walker::{Node, Visit, Visitor, Walker};

#[derive(Debug, Default, Clone, Copy)]
pub struct Coercer;

impl Visitor for Coercer {
    fn visit(&mut self, walker: &Walker<'_>, node: &Node<'_>) -> Result<Visit, SchemaError> {
        let replacement = match node.schema {
            Some(Schema::Primitive(primitive)) => coerce_leaf(primitive.kind, node.value),
            Some(Schema::Choice(choices)) => coerce_choice(walker, choices, node.value)?,
            _ => None,
        };
        Ok(match replacement {
            Some(value) => {
                log::debug!("Coerced `{}` from {} to {value}", node.path, node.value);
                Visit::Replace(value)
            }
            None => Visit::Continue,
        })
    }
}

/// Leaves a value that already satisfies an alternative alone; otherwise takes the
/// first alternative that converts it.
fn coerce_choice(
    walker: &Walker<'_>,
    choices: &[Schema],
    value: &Value,
) -> Result<Option<Value>, SchemaError> {
    if satisfies_any(walker, choices, value)? {
        return Ok(None);
    }
    for choice in choices {
        let attempt = match walker.named_types().resolve(choice)? {
            Schema::Primitive(primitive) => coerce_leaf(primitive.kind, value),
            Schema::Choice(nested) => coerce_choice(walker, nested, value)?,
            _ => None,
        };
        if attempt.is_some() {
            return Ok(attempt);
        }
    }
    Ok(None)
}

/// Converts `value` to `kind`, or returns `None` when it already is of that kind or
/// cannot be converted. Only scalars are converted; null, lists and objects never are.
#[must_use]
pub fn coerce_leaf(kind: PrimitiveKind, value: &Value) -> Option<Value> {
    if kind.accepts(value) {
        return None;
    }
    match (kind, value) {
        (PrimitiveKind::Int, Value::Float(x)) => float_to_int(*x),
        (PrimitiveKind::Int, Value::Bool(b)) => Some(Value::Int(i64::from(*b))),
        (PrimitiveKind::Int, Value::Str(s)) => s.trim().parse().ok().map(Value::Int),
        (PrimitiveKind::Float, Value::Int(i)) => Some(Value::Float(*i as f64)),
        (PrimitiveKind::Float, Value::Bool(b)) => Some(Value::Float(f64::from(u8::from(*b)))),
        (PrimitiveKind::Float, Value::Str(s)) => s.trim().parse().ok().map(Value::Float),
        (PrimitiveKind::Str, Value::Int(i)) => Some(Value::Str(i.to_string())),
        (PrimitiveKind::Str, Value::Float(x)) => Some(Value::Str(format_float(*x))),
        (PrimitiveKind::Str, Value::Bool(b)) => Some(Value::Str(b.to_string())),
        (PrimitiveKind::Bool, Value::Int(i)) => Some(Value::Bool(*i != 0)),
        (PrimitiveKind::Bool, Value::Float(x)) => Some(Value::Bool(*x != 0.0)),
        (PrimitiveKind::Bool, Value::Str(s)) => Some(Value::Bool(!s.is_empty())),
        _ => None,
    }
}

/// Truncates toward zero; non-finite and out-of-range floats do not convert.
fn float_to_int(x: f64) -> Option<Value> {
    const LIMIT: f64 = 9_223_372_036_854_775_808.0; // 2^63
    let truncated = x.trunc();
    if !truncated.is_finite() || truncated < -LIMIT || truncated >= LIMIT {
        return None;
    }
    Some(Value::Int(truncated as i64))
}

/// Whole floats keep a trailing `.0` so the text still reads as a float.
fn format_float(x: f64) -> String {
    if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e16 {
        format!("{x:.1}")
    } else {
        x.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_to_int_trims_whitespace() {
        assert_eq!(
            coerce_leaf(PrimitiveKind::Int, &Value::from(" 42 ")),
            Some(Value::Int(42))
        );
        assert_eq!(coerce_leaf(PrimitiveKind::Int, &Value::from("4.2")), None);
    }

    #[test]
    fn test_float_to_int_truncates() {
        assert_eq!(
            coerce_leaf(PrimitiveKind::Int, &Value::Float(-2.7)),
            Some(Value::Int(-2))
        );
        assert_eq!(coerce_leaf(PrimitiveKind::Int, &Value::Float(f64::NAN)), None);
        assert_eq!(coerce_leaf(PrimitiveKind::Int, &Value::Float(1e19)), None);
    }

    #[test]
    fn test_float_to_text_keeps_fraction_marker() {
        assert_eq!(
            coerce_leaf(PrimitiveKind::Str, &Value::Float(2.0)),
            Some(Value::from("2.0"))
        );
        assert_eq!(
            coerce_leaf(PrimitiveKind::Str, &Value::Float(0.25)),
            Some(Value::from("0.25"))
        );
    }

    #[test]
    fn test_same_kind_and_containers_are_untouched() {
        assert_eq!(coerce_leaf(PrimitiveKind::Int, &Value::Int(1)), None);
        assert_eq!(coerce_leaf(PrimitiveKind::Str, &Value::Null), None);
        assert_eq!(coerce_leaf(PrimitiveKind::Str, &Value::List(vec![])), None);
    }

    #[test]
    fn test_text_to_bool_is_non_empty() {
        assert_eq!(
            coerce_leaf(PrimitiveKind::Bool, &Value::from("false")),
            Some(Value::Bool(true))
        );
        assert_eq!(
            coerce_leaf(PrimitiveKind::Bool, &Value::from("")),
            Some(Value::Bool(false))
        );
    }
}
