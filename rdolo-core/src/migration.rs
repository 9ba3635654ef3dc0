//! One-off migration of the legacy calibration layout.
//!
//! Old documents nest the calibration under three keys:
//!
//! ```yaml
//! calibration:
//!   steady_state: {k: 10}
//!   parameters: {beta: 0.95}
//!   covariances: "[[0.01]]"
//! ```
//!
//! The current layout has a flat `calibration` mapping and a top-level
//! `covariances` matrix.

use crate::document::{child_path, describe, expect_mapping, RawDocument};
use crate::errors::{ImportError, ImportResult};
use log::warn;
use serde_yaml::{Mapping, Value};

/// Whether the document uses the legacy calibration layout.
pub fn is_legacy_calibration(document: &RawDocument) -> bool {
    document
        .get("calibration")
        .and_then(Value::as_mapping)
        .is_some_and(|c| c.contains_key("steady_state"))
}

/// Rewrites a legacy calibration block into the current layout.
///
/// `steady_state` and `parameters` are merged into a flat mapping, with
/// `parameters` winning on collisions. The legacy `covariances` entry is
/// parsed straight away and hoisted to the top level, so a malformed literal
/// fails here rather than later in the import.
///
/// Documents already in the current layout are returned unchanged.
pub fn migrate_legacy_calibration(document: RawDocument) -> ImportResult<RawDocument> {
    if !is_legacy_calibration(&document) {
        return Ok(document);
    }
    warn!("Calibration uses the legacy 'steady_state'/'parameters' layout; migrating it");

    let (document, legacy) = document.without("calibration");
    let legacy = legacy.unwrap_or(Value::Null);
    let legacy = expect_mapping(&legacy, "calibration")?;

    let mut calibration = Mapping::new();
    for section in ["steady_state", "parameters"] {
        if let Some(values) = legacy.get(section) {
            let values = expect_mapping(values, &child_path("calibration", section))?;
            for (key, value) in values {
                calibration.insert(key.clone(), value.clone());
            }
        }
    }

    let document = document.with("calibration", Value::Mapping(calibration));
    match legacy.get("covariances") {
        Some(covariances) => Ok(document.with("covariances", parse_legacy_covariances(covariances)?)),
        None => Ok(document),
    }
}

/// Parses a legacy covariance entry, which is usually a string holding a
/// nested list literal such as `"[[0.01, 0], [0, 0.01]]"`.
pub fn parse_legacy_covariances(value: &Value) -> ImportResult<Value> {
    let parsed = match value {
        Value::String(literal) => serde_yaml::from_str::<Value>(literal)
            .map_err(|e| ImportError::parse("legacy covariances", e))?,
        other => other.clone(),
    };
    if !parsed.is_sequence() {
        return Err(ImportError::parse(
            "legacy covariances",
            format!("expected a nested list, found {}", describe(&parsed)),
        ));
    }
    Ok(parsed)
}
