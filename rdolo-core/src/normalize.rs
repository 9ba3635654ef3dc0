//! Schema normalisation of a raw model document.
//!
//! Normalisation resolves backward-compatible aliases, applies defaults and
//! migrates the legacy calibration layout, then extracts typed fields. The
//! result is a [`NormalizedDocument`]; the raw document is consumed.

use crate::calibration::{calibration_from_value, SymbolicCalibration};
use crate::config::ImportConfig;
use crate::document::{expect_mapping, grouped_strings, invalid, RawDocument};
use crate::errors::{ImportError, ImportResult};
use crate::migration::migrate_legacy_calibration;
use crate::model_type::ModelType;
use crate::symbolic::{SymbolTable, SymbolicEquations};
use log::{debug, info, warn};
use serde_yaml::{Mapping, Value};

/// A model document in the current schema with typed core sections.
///
/// Stochastic sections are still raw: which ones are required depends on the
/// model type, which is resolved afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedDocument {
    pub name: String,
    /// Type given by the document, if any.
    pub declared_type: Option<ModelType>,
    pub symbols: SymbolTable,
    pub equations: SymbolicEquations,
    pub calibration: SymbolicCalibration,
    pub covariances: Option<Value>,
    pub distribution: Option<Value>,
    pub discrete_transition: Option<Value>,
    pub markov_chain: Option<Value>,
    pub options: Option<Value>,
    pub definitions: Mapping,
}

/// Normalises a raw document.
///
/// Rules, in order:
/// 1. `declarations` is accepted in place of `symbols`
/// 2. an explicit `model_type` is parsed; otherwise it is left for inference
/// 3. a missing `name` is replaced by the configured default name
/// 4. the symbol group `auxiliary` is renamed to `auxiliaries`
/// 5. `equations` must be present
/// 6. `calibration` must be present
/// 7. a legacy calibration block is migrated to the current layout
pub fn normalize(document: RawDocument, config: &ImportConfig) -> ImportResult<NormalizedDocument> {
    let symbols_value = match (document.get("symbols"), document.get("declarations")) {
        (Some(symbols), _) => symbols.clone(),
        (None, Some(declarations)) => {
            warn!("Section 'declarations' is deprecated; use 'symbols' instead");
            declarations.clone()
        }
        (None, None) => return Err(ImportError::missing("symbols")),
    };
    let mut symbols = SymbolTable::from_groups(grouped_strings(&symbols_value, "symbols")?);

    let declared_type = match document.get("model_type") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.parse::<ModelType>()?),
        Some(other) => return Err(invalid("model_type", "a string", other)),
    };

    let name = match document.get("name") {
        Some(Value::String(name)) => name.clone(),
        Some(Value::Number(n)) => n.to_string(),
        None | Some(Value::Null) => {
            info!("Missing model name. Set as '{}'", config.default_name);
            config.default_name.clone()
        }
        Some(other) => return Err(invalid("name", "a string", other)),
    };

    if symbols.rename_group("auxiliary", "auxiliaries") {
        debug!("Renamed symbol group 'auxiliary' to 'auxiliaries'");
    }

    let equations = match document.get("equations") {
        Some(value) => SymbolicEquations::from_groups(grouped_strings(value, "equations")?),
        None => return Err(ImportError::missing("equations")),
    };

    if !document.contains("calibration") {
        return Err(ImportError::missing("calibration"));
    }
    let document = migrate_legacy_calibration(document)?;
    let calibration = match document.get("calibration") {
        Some(value) => calibration_from_value(value, "calibration")?,
        None => return Err(ImportError::missing("calibration")),
    };

    let definitions = match document.get("definitions") {
        None | Some(Value::Null) => Mapping::new(),
        Some(value) => expect_mapping(value, "definitions")?.clone(),
    };

    Ok(NormalizedDocument {
        name,
        declared_type,
        symbols,
        equations,
        calibration,
        covariances: optional(&document, "covariances"),
        distribution: optional(&document, "distribution"),
        discrete_transition: optional(&document, "discrete_transition"),
        markov_chain: optional(&document, "markov_chain"),
        options: optional(&document, "options"),
        definitions,
    })
}

// An explicit null is treated like an absent entry
fn optional(document: &RawDocument, key: &str) -> Option<Value> {
    document.get(key).filter(|v| !v.is_null()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::CalibrationValue;
    use crate::parser::parse_yaml;

    fn normalize_text(text: &str) -> ImportResult<NormalizedDocument> {
        normalize(parse_yaml(text).unwrap(), &ImportConfig::default())
    }

    const BASIC: &str = r#"
symbols: {states: [k], controls: [c], auxiliary: [y]}
equations: {transition: ["k = k(-1)"]}
calibration: {k: 1.0}
"#;

    #[test]
    fn test_basic_normalization() {
        let doc = normalize_text(BASIC).unwrap();
        assert_eq!(doc.name, "anonymous");
        assert_eq!(doc.declared_type, None);
        assert!(doc.symbols.contains_group("auxiliaries"));
        assert!(!doc.symbols.contains_group("auxiliary"));
        assert_eq!(doc.equations.group("transition").unwrap().len(), 1);
        assert_eq!(doc.calibration["k"], CalibrationValue::Number(1.0));
        assert!(doc.definitions.is_empty());
        assert!(doc.distribution.is_none());
    }

    #[test]
    fn test_declarations_alias() {
        let doc = normalize_text(
            "declarations: {variables: [y]}\nequations: {}\ncalibration: {}\nname: old",
        )
        .unwrap();
        assert_eq!(doc.symbols.group("variables").unwrap(), &["y".to_string()][..]);
        assert_eq!(doc.name, "old");
    }

    #[test]
    fn test_missing_symbols() {
        let err = normalize_text("equations: {}\ncalibration: {}").unwrap_err();
        assert!(
            matches!(err, ImportError::MissingSection { ref section, model_type: None } if section == "symbols")
        );
    }

    #[test]
    fn test_missing_equations() {
        let err = normalize_text("symbols: {states: [k]}\ncalibration: {}").unwrap_err();
        assert!(matches!(err, ImportError::MissingSection { ref section, .. } if section == "equations"));
    }

    #[test]
    fn test_missing_calibration() {
        let err = normalize_text("symbols: {states: [k]}\nequations: {}").unwrap_err();
        assert!(
            matches!(err, ImportError::MissingSection { ref section, .. } if section == "calibration")
        );
    }

    #[test]
    fn test_explicit_model_type() {
        let doc = normalize_text(&format!("model_type: dynare\n{BASIC}")).unwrap();
        assert_eq!(doc.declared_type, Some(ModelType::Dynare));

        let err = normalize_text(&format!("model_type: fancy\n{BASIC}")).unwrap_err();
        assert!(matches!(err, ImportError::ModelType(_)));
    }

    #[test]
    fn test_null_name_and_model_type_count_as_absent() {
        let doc = normalize_text(&format!("name:\nmodel_type:\n{BASIC}")).unwrap();
        assert_eq!(doc.name, "anonymous");
        assert_eq!(doc.declared_type, None);
    }

    #[test]
    fn test_name_must_be_text() {
        let err = normalize_text(&format!("name: [a, b]\n{BASIC}")).unwrap_err();
        assert!(matches!(err, ImportError::InvalidField { ref path, .. } if path == "name"));
    }

    #[test]
    fn test_configured_default_name() {
        let config = ImportConfig {
            default_name: "unnamed".to_string(),
            ..ImportConfig::default()
        };
        let doc = normalize(parse_yaml(BASIC).unwrap(), &config).unwrap();
        assert_eq!(doc.name, "unnamed");
    }

    #[test]
    fn test_legacy_calibration() {
        let doc = normalize_text(
            r#"
symbols: {states: [k], parameters: [beta]}
equations: {transition: ["k = k(-1)"]}
calibration:
  steady_state: {k: 10}
  parameters: {beta: 0.95}
  covariances: "[[0.01]]"
"#,
        )
        .unwrap();
        assert_eq!(doc.calibration.len(), 2);
        assert_eq!(doc.calibration["k"], CalibrationValue::Number(10.0));
        assert_eq!(doc.calibration["beta"], CalibrationValue::Number(0.95));
        assert_eq!(doc.covariances, Some(Value::from(vec![vec![0.01]])));
    }

    #[test]
    fn test_passthrough_sections() {
        let doc = normalize_text(&format!(
            "{BASIC}\noptions: {{grid: {{n: 10}}}}\ndefinitions: {{r: 1/beta}}\nmarkov_chain: [[0, 1]]"
        ))
        .unwrap();
        assert!(doc.options.unwrap().is_mapping());
        assert_eq!(doc.definitions.get("r"), Some(&Value::from("1/beta")));
        assert!(doc.markov_chain.unwrap().is_sequence());
    }

    #[test]
    fn test_bad_symbols_shape() {
        let err = normalize_text("symbols: [k, c]\nequations: {}\ncalibration: {}").unwrap_err();
        assert!(matches!(err, ImportError::InvalidField { ref path, .. } if path == "symbols"));
    }
}
