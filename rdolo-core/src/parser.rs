//! Conversion of document text into a [`RawDocument`].

use crate::document::RawDocument;
use crate::errors::{ImportError, ImportResult};
use serde_yaml::Value;

/// Rewrites every `^` to `**`.
///
/// This is a plain textual substitution: a `^` inside a quoted string or a
/// symbol name is rewritten too.
pub fn rewrite_power_operator(text: &str) -> String {
    text.replace('^', "**")
}

/// Parses YAML text into a raw document, without any operator rewriting.
pub fn parse_yaml(text: &str) -> ImportResult<RawDocument> {
    let value: Value =
        serde_yaml::from_str(text).map_err(|e| ImportError::parse("model document", e))?;
    RawDocument::from_value(value)
}

/// Parses model text, optionally normalising the power operator first.
pub fn parse_document(text: &str, rewrite_power: bool) -> ImportResult<RawDocument> {
    if rewrite_power {
        parse_yaml(&rewrite_power_operator(text))
    } else {
        parse_yaml(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_rewrite() {
        assert_eq!(rewrite_power_operator("k^alpha"), "k**alpha");
        assert_eq!(rewrite_power_operator("(a^b)^c"), "(a**b)**c");
        assert_eq!(rewrite_power_operator("a**b"), "a**b");
    }

    #[test]
    fn test_rewrite_is_blind_to_quotes() {
        let doc = parse_document("name: 'a^b'", true).unwrap();
        assert_eq!(doc.get("name"), Some(&Value::from("a**b")));
    }

    #[test]
    fn test_parse_without_rewrite() {
        let doc = parse_document("equations: {f: ['y = k^a']}", false).unwrap();
        let eq = &doc.get("equations").unwrap()["f"][0];
        assert_eq!(eq, &Value::from("y = k^a"));
    }

    #[test]
    fn test_malformed_text() {
        let err = parse_document("symbols: [states: {", true).unwrap_err();
        assert!(matches!(err, ImportError::Parse { .. }));
    }

    #[test]
    fn test_scalar_document_rejected() {
        assert!(matches!(
            parse_document("just a string", true),
            Err(ImportError::Parse { .. })
        ));
    }
}
