//! Dotted field paths.
//!
//! A path names a field's position from the generation root. Nested fields
//! are joined with `.`; collection elements append their index directly
//! (`tags0`), and map entries append `key`/`value` after the index
//! (`labels0key`, `labels0value`).

use std::borrow::Cow;

pub fn child_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

pub fn element_path(parent: &str, index: usize) -> String {
    format!("{parent}{index}")
}

pub fn entry_key_path(parent: &str, index: usize) -> String {
    format!("{parent}{index}key")
}

pub fn entry_value_path(parent: &str, index: usize) -> String {
    format!("{parent}{index}value")
}

/// Path as shown in error messages.
pub fn display_path(path: &str) -> Cow<'_, str> {
    if path.is_empty() {
        Cow::Borrowed("<root>")
    } else {
        Cow::Owned(format!("`{path}`"))
    }
}

/// Override pattern matching exactly `path`.
pub fn override_hint(path: &str) -> String {
    regex::escape(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_nested_and_indexed_segments() {
        assert_eq!(child_path("", "one"), "one");
        assert_eq!(child_path("inner", "one"), "inner.one");
        assert_eq!(element_path("three", 0), "three0");
        assert_eq!(child_path(&element_path("items", 2), "name"), "items2.name");
        assert_eq!(entry_key_path("labels", 1), "labels1key");
        assert_eq!(entry_value_path("labels", 1), "labels1value");
    }

    #[test]
    fn hint_escapes_dots() {
        assert_eq!(override_hint("inner.one"), r"inner\.one");
        assert_eq!(display_path(""), "<root>");
        assert_eq!(display_path("a.b"), "`a.b`");
    }
}
