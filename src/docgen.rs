//! Documentation text for datatypes.

use crate::schema::Schema;

pub const DEFAULT_WIDTH: usize = 80;

/// Renders the `Return datatype:` block. The definition is printed on one line
/// when it fits in `width`, otherwise as indented JSON.
#[must_use]
pub fn gendocs(schema: &Schema, width: usize) -> String {
    let width = width.saturating_sub(4);
    let compact = schema.to_definition().to_string();
    let rendered = if compact.chars().count() <= width {
        compact
    } else {
        match schema.to_json() {
            Ok(pretty) => pretty,
            Err(_) => compact,
        }
    };
    format!("Return datatype:\n{}", indent(&rendered, 4))
}

/// Appends the datatype block to `doc`, indented like the rest of the text.
#[must_use]
pub fn add_docs(doc: &str, schema: &Schema) -> String {
    let min_indent = getindent(doc);
    format!(
        "{doc}\n\n{}",
        indent(&gendocs(schema, DEFAULT_WIDTH.saturating_sub(min_indent)), min_indent)
    )
}

/// Indents each line by `level` spaces.
#[must_use]
pub fn indent(text: &str, level: usize) -> String {
    let pad = " ".repeat(level);
    text.lines()
        .map(|line| format!("{pad}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The smallest non-zero indentation among the non-blank lines, or 0 if there is none.
/// The first line of a doc comment usually starts right after the opening quote, so
/// unindented lines are ignored.
#[must_use]
pub fn getindent(text: &str) -> usize {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start_matches(' ').len())
        .filter(|spaces| *spaces != 0)
        .min()
        .unwrap_or(0)
}
