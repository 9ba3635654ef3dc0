//! Model variants and inference of the variant from declared symbol groups.

use crate::errors::{ImportError, ImportResult};
use crate::symbolic::SymbolTable;
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Structural variant of an economic model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    /// Discrete time, Markov switching, with discrete exogenous states.
    Dtmscc,
    /// Discrete time with continuous exogenous shocks.
    Dtcscc,
    /// Variable-based layout inherited from Dynare.
    Dynare,
}

impl ModelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::Dtmscc => "dtmscc",
            ModelType::Dtcscc => "dtcscc",
            ModelType::Dynare => "dynare",
        }
    }

    /// Whether models of this type are wrapped as a numeric model
    /// (as opposed to a Dynare-style model).
    pub fn is_numeric(&self) -> bool {
        matches!(self, ModelType::Dtcscc | ModelType::Dtmscc)
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelType {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dtmscc" => Ok(ModelType::Dtmscc),
            "dtcscc" => Ok(ModelType::Dtcscc),
            "dynare" => Ok(ModelType::Dynare),
            other => Err(ImportError::ModelType(format!(
                "Unknown model type '{other}'. Valid types: dtmscc, dtcscc, dynare"
            ))),
        }
    }
}

/// Returns the model type, inferring it from the symbol groups when it wasn't declared.
///
/// Inference is by priority rather than by name: `markov_states` wins over
/// `states`, which wins over `variables`.
pub fn resolve_model_type(
    declared: Option<ModelType>,
    symbols: &SymbolTable,
) -> ImportResult<ModelType> {
    if let Some(model_type) = declared {
        return Ok(model_type);
    }

    let model_type = if symbols.contains_group("markov_states") {
        ModelType::Dtmscc
    } else if symbols.contains_group("states") {
        ModelType::Dtcscc
    } else if symbols.contains_group("variables") {
        ModelType::Dynare
    } else {
        return Err(ImportError::ModelType(
            "'model_type' was not defined and couldn't be guessed.".to_string(),
        ));
    };
    info!("Model type detected as '{}'", model_type);
    Ok(model_type)
}
