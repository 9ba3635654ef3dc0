//! Construction and validation of covariance matrices.
//!
//! Entries may be plain numbers or expressions referring to calibrated
//! parameters, so the matrix holds [`CalibrationValue`]s rather than floats.

use crate::calibration::CalibrationValue;
use crate::errors::{ImportError, ImportResult};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// A square matrix of covariance entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CovarianceMatrix {
    entries: Array2<CalibrationValue>,
}

impl CovarianceMatrix {
    /// Wraps an array, checking that it is square.
    pub fn from_array(entries: Array2<CalibrationValue>) -> ImportResult<Self> {
        let (rows, cols) = entries.dim();
        if rows != cols {
            return Err(not_square(&format!("({rows}, {cols})")));
        }
        Ok(Self { entries })
    }

    /// Builds the matrix from a nested sequence document value.
    pub fn from_value(value: &Value) -> ImportResult<Self> {
        let rows = value.as_sequence().ok_or_else(|| incorrect(value))?;

        let is_row = |v: &Value| v.is_sequence();
        if rows.is_empty() || rows.iter().all(|r| !is_row(r)) {
            // A flat list is one-dimensional
            return Err(not_square(&format!("({},)", rows.len())));
        }
        if !rows.iter().all(is_row) {
            return Err(incorrect(value));
        }

        let n_rows = rows.len();
        let mut n_cols = None;
        let mut flat = Vec::new();
        for row in rows {
            let row = row.as_sequence().ok_or_else(|| incorrect(value))?;
            match n_cols {
                None => n_cols = Some(row.len()),
                Some(n) if n != row.len() => return Err(incorrect(value)),
                Some(_) => {}
            }
            for entry in row {
                match entry {
                    Value::Number(_) | Value::String(_) => {
                        flat.push(CalibrationValue::from_value(entry, "covariances")?)
                    }
                    Value::Sequence(_) => {
                        return Err(not_square(&format!(
                            "({}, {}, ...)",
                            n_rows,
                            row.len()
                        )))
                    }
                    _ => return Err(incorrect(value)),
                }
            }
        }

        let n_cols = n_cols.unwrap_or(0);
        let entries = Array2::from_shape_vec((n_rows, n_cols), flat)
            .map_err(|e| ImportError::CovarianceShape(e.to_string()))?;
        Self::from_array(entries)
    }

    pub fn entries(&self) -> &Array2<CalibrationValue> {
        &self.entries
    }

    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.entries.nrows()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.entries.dim()
    }

    /// The matrix as floats, if no entry is an expression.
    pub fn to_numeric(&self) -> Option<Array2<f64>> {
        let values = self
            .entries
            .iter()
            .map(CalibrationValue::as_number)
            .collect::<Option<Vec<_>>>()?;
        Array2::from_shape_vec(self.entries.dim(), values).ok()
    }
}

fn incorrect(value: &Value) -> ImportError {
    let rendered = serde_yaml::to_string(value).unwrap_or_else(|_| format!("{value:?}"));
    ImportError::CovarianceShape(format!(
        "Incorrect covariances matrix: {}.",
        rendered.trim()
    ))
}

fn not_square(shape: &str) -> ImportError {
    ImportError::CovarianceShape(format!(
        "Covariances matrix should be square. Found {shape} matrix"
    ))
}

/// Builds the covariance matrix if the document has one.
pub fn build_covariances(value: Option<&Value>) -> ImportResult<Option<CovarianceMatrix>> {
    value.map(CovarianceMatrix::from_value).transpose()
}
