//! Raw document representation and typed extraction helpers.
//!
//! A parsed model document is kept as a [`serde_yaml::Value`] tree: a tagged
//! union of scalars, sequences and mappings which preserves key order.
//! The helpers here pull typed fields out of that tree and report mismatches
//! with the dotted path of the offending field (e.g. `symbols.states[1]`).

use crate::errors::{ImportError, ImportResult};
use serde_yaml::{Mapping, Value};

/// Top-level mapping of a parsed model document.
///
/// Only exists while a document is being imported.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDocument {
    entries: Mapping,
}

impl RawDocument {
    /// Build a document from a parsed value, which must be a mapping.
    ///
    /// An empty document parses to null and is read as an empty mapping, so
    /// it fails later on its missing sections.
    pub fn from_value(value: Value) -> ImportResult<Self> {
        match value {
            Value::Mapping(entries) => Ok(Self { entries }),
            Value::Null => Ok(Self::default()),
            other => Err(ImportError::parse(
                "model document",
                format!("expected a mapping at the top level, found {}", describe(&other)),
            )),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Return a copy of this document with `key` set to `value`.
    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.entries.insert(Value::from(key), value);
        self
    }

    /// Return a copy of this document without `key`, along with the removed value.
    pub fn without(mut self, key: &str) -> (Self, Option<Value>) {
        let removed = self.entries.remove(key);
        (self, removed)
    }

}

/// Short human description of the kind of a value, used in error messages.
pub fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Path of a mapping entry below `parent`.
pub fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

/// Path of a sequence element below `parent`.
pub fn index_path(parent: &str, index: usize) -> String {
    format!("{parent}[{index}]")
}

pub(crate) fn invalid(path: &str, expected: &str, found: &Value) -> ImportError {
    ImportError::InvalidField {
        path: path.to_string(),
        expected: expected.to_string(),
        found: describe(found).to_string(),
    }
}

pub fn expect_mapping<'a>(value: &'a Value, path: &str) -> ImportResult<&'a Mapping> {
    value
        .as_mapping()
        .ok_or_else(|| invalid(path, "a mapping", value))
}

/// Reads a mapping key as a string.
///
/// Numeric keys are accepted and rendered as text since YAML parses a bare
/// `1:` as a number.
pub fn key_string(key: &Value, path: &str) -> ImportResult<String> {
    match key {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(invalid(path, "a string key", other)),
    }
}

/// Reads a scalar as text. Numbers are rendered back to their literal form.
pub fn scalar_string(value: &Value, path: &str) -> ImportResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(invalid(path, "a string", other)),
    }
}

/// Reads a sequence of strings. A null entry is read as an empty list.
pub fn string_list(value: &Value, path: &str) -> ImportResult<Vec<String>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| scalar_string(item, &index_path(path, i)))
            .collect(),
        other => Err(invalid(path, "a sequence of strings", other)),
    }
}

/// Reads a mapping of name -> sequence of strings, keeping the key order.
pub fn grouped_strings(value: &Value, path: &str) -> ImportResult<Vec<(String, Vec<String>)>> {
    let mapping = expect_mapping(value, path)?;
    mapping
        .iter()
        .map(|(key, items)| {
            let name = key_string(key, path)?;
            let items = string_list(items, &child_path(path, &name))?;
            Ok((name, items))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_document_requires_mapping() {
        let err = RawDocument::from_value(yaml("[1, 2]")).unwrap_err();
        assert!(matches!(err, ImportError::Parse { .. }));
    }

    #[test]
    fn test_empty_document_is_empty_mapping() {
        let doc = RawDocument::from_value(Value::Null).unwrap();
        assert_eq!(doc, RawDocument::default());
        assert!(!doc.contains("symbols"));
    }

    #[test]
    fn test_with_and_without_are_copies() {
        let doc = RawDocument::from_value(yaml("a: 1")).unwrap();
        let doc = doc.with("b", Value::from(2));
        assert!(doc.contains("a"));
        assert!(doc.contains("b"));

        let (doc, removed) = doc.without("a");
        assert_eq!(removed, Some(Value::from(1)));
        assert!(!doc.contains("a"));
    }

    #[test]
    fn test_grouped_strings_keeps_order() {
        let value = yaml("states: [k, z]\ncontrols: [c]\nauxiliaries:\n");
        let groups = grouped_strings(&value, "symbols").unwrap();
        assert_eq!(
            groups[0],
            ("states".to_string(), vec!["k".to_string(), "z".to_string()])
        );
        assert_eq!(groups[1], ("controls".to_string(), vec!["c".to_string()]));
        assert_eq!(groups[2], ("auxiliaries".to_string(), vec![]));
    }

    #[test]
    fn test_type_mismatch_reports_path() {
        let value = yaml("{states: [k, {a: 1}]}");
        let err = grouped_strings(&value, "symbols").unwrap_err();
        match err {
            ImportError::InvalidField { path, found, .. } => {
                assert_eq!(path, "symbols.states[1]");
                assert_eq!(found, "a mapping");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_numbers_read_as_text() {
        let value = yaml("[1, 2.5, x]");
        assert_eq!(
            string_list(&value, "eq").unwrap(),
            vec!["1".to_string(), "2.5".to_string(), "x".to_string()]
        );
    }
}
