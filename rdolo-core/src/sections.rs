//! Checks that the stochastic structure matching the model type is present.
//!
//! Models with continuous shocks (`dtcscc`, `dynare`) need a `distribution`;
//! Markov switching models (`dtmscc`) need a `discrete_transition`. Both can
//! be derived from older sections (`covariances`, `markov_chain`).

use crate::document::{expect_mapping, invalid};
use crate::errors::{ImportError, ImportResult};
use crate::model_type::ModelType;
use crate::normalize::NormalizedDocument;
use crate::symbolic::{DiscreteTransition, Distribution, StochasticSpec};
use log::debug;
use serde_yaml::Value;

/// Stochastic sections of a model after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct StochasticSections {
    pub distribution: Option<Distribution>,
    pub discrete_transition: Option<DiscreteTransition>,
}

fn spec_from_value(value: &Value, path: &str) -> ImportResult<StochasticSpec> {
    Ok(StochasticSpec::from_mapping(expect_mapping(value, path)?.clone()))
}

/// Validates, and where possible synthesises, the stochastic sections for `model_type`.
pub fn validate_sections(
    model_type: ModelType,
    document: &NormalizedDocument,
) -> ImportResult<StochasticSections> {
    let mut distribution = document
        .distribution
        .as_ref()
        .map(|v| spec_from_value(v, "distribution"))
        .transpose()?;
    let mut discrete_transition = document
        .discrete_transition
        .as_ref()
        .map(|v| spec_from_value(v, "discrete_transition"))
        .transpose()?;

    match model_type {
        ModelType::Dtcscc | ModelType::Dynare => {
            if distribution.is_none() {
                let covariances = document
                    .covariances
                    .as_ref()
                    .ok_or_else(|| ImportError::missing_for("distribution", model_type))?;
                debug!("Using 'covariances' as a Normal distribution");
                distribution = Some(StochasticSpec::new("Normal", covariances.clone()));
            }
        }
        ModelType::Dtmscc => {
            if discrete_transition.is_none() {
                let markov_chain = document
                    .markov_chain
                    .as_ref()
                    .ok_or_else(|| ImportError::missing_for("discrete_transition", model_type))?;
                discrete_transition = Some(match markov_chain {
                    Value::Sequence(_) => StochasticSpec::new("MarkovChain", markov_chain.clone()),
                    Value::Mapping(entries) => StochasticSpec::from_mapping(entries.clone()),
                    other => {
                        return Err(invalid("markov_chain", "a sequence or a mapping", other))
                    }
                });
            }
        }
    }

    Ok(StochasticSections {
        distribution,
        discrete_transition,
    })
}
