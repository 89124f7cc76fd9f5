/// Appends a list index to a traversal path: `items` + 2 -> `items[2]`.
pub fn join_index(path: &str, index: usize) -> String {
    format!("{path}[{index}]")
}

/// Appends an object key to a traversal path. The root path is empty, so a
/// top-level key is just the key itself.
pub fn join_key(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}
