//! Symbolic calibration values and defaulting of uncalibrated symbols.
//!
//! A calibration maps symbol names either to a number or to an expression
//! referencing other calibrated symbols. Expressions are kept as opaque
//! strings; evaluating them is left to the numeric backend.
//!
//! After [`fill_calibration_defaults`] every declared symbol has a value:
//!
//! | Group                     | Default |
//! |---------------------------|---------|
//! | `shocks`, `markov_states` | `0`     |
//! | `states`, `controls`      | `NaN`   |
//! | anything else             | `NaN`   |
//!
//! `NaN` marks a value that is unset and still has to be solved for.

use crate::document::{child_path, expect_mapping, invalid, key_string};
use crate::errors::ImportResult;
use crate::symbolic::SymbolTable;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Value assigned to a symbol in the calibration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CalibrationValue {
    Number(f64),
    /// Algebraic expression, e.g. `"1/beta - 1"`. Never evaluated here.
    Expression(String),
}

impl CalibrationValue {
    /// A value that still has to be determined.
    pub fn unset() -> Self {
        CalibrationValue::Number(f64::NAN)
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, CalibrationValue::Number(x) if x.is_nan())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CalibrationValue::Number(x) => Some(*x),
            CalibrationValue::Expression(_) => None,
        }
    }

    pub fn as_expression(&self) -> Option<&str> {
        match self {
            CalibrationValue::Number(_) => None,
            CalibrationValue::Expression(e) => Some(e),
        }
    }

    /// Reads a scalar document value. Numbers stay numbers, strings become expressions.
    pub fn from_value(value: &Value, path: &str) -> ImportResult<Self> {
        match value {
            Value::Number(n) => match n.as_f64() {
                Some(x) => Ok(CalibrationValue::Number(x)),
                None => Err(invalid(path, "a number or an expression", value)),
            },
            Value::String(s) => Ok(CalibrationValue::Expression(s.clone())),
            other => Err(invalid(path, "a number or an expression", other)),
        }
    }
}

// NaN is the "unset" marker, so two unset values compare equal.
impl PartialEq for CalibrationValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CalibrationValue::Number(a), CalibrationValue::Number(b)) => {
                a == b || (a.is_nan() && b.is_nan())
            }
            (CalibrationValue::Expression(a), CalibrationValue::Expression(b)) => a == b,
            _ => false,
        }
    }
}

impl From<f64> for CalibrationValue {
    fn from(value: f64) -> Self {
        CalibrationValue::Number(value)
    }
}

impl From<&str> for CalibrationValue {
    fn from(value: &str) -> Self {
        CalibrationValue::Expression(value.to_string())
    }
}

impl fmt::Display for CalibrationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalibrationValue::Number(x) => write!(f, "{x}"),
            CalibrationValue::Expression(e) => f.write_str(e),
        }
    }
}

/// Mapping from symbol name to its calibrated value or defining expression.
pub type SymbolicCalibration = BTreeMap<String, CalibrationValue>;

/// Reads a flat `symbol: value` calibration mapping.
pub fn calibration_from_value(value: &Value, path: &str) -> ImportResult<SymbolicCalibration> {
    let mapping = expect_mapping(value, path)?;
    let mut calibration = SymbolicCalibration::new();
    for (key, entry) in mapping {
        let name = key_string(key, path)?;
        let parsed = CalibrationValue::from_value(entry, &child_path(path, &name))?;
        calibration.insert(name, parsed);
    }
    Ok(calibration)
}

/// Default value for an uncalibrated symbol of `group`.
pub fn default_value_for_group(group: &str) -> CalibrationValue {
    match group {
        "shocks" | "markov_states" => CalibrationValue::Number(0.0),
        "controls" | "states" => CalibrationValue::unset(),
        _ => CalibrationValue::unset(),
    }
}

/// Returns `calibration` extended with a default for every declared symbol it lacks.
///
/// Explicit entries are never overwritten, so applying this more than once
/// gives the same result as applying it once.
pub fn fill_calibration_defaults(
    calibration: &SymbolicCalibration,
    symbols: &SymbolTable,
) -> SymbolicCalibration {
    let mut filled = calibration.clone();
    for (group, names) in symbols.iter() {
        let default = default_value_for_group(group);
        for name in names {
            filled
                .entry(name.clone())
                .or_insert_with(|| default.clone());
        }
    }
    filled
}
