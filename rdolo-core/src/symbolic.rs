//! The symbolic model and its building blocks.
//!
//! A [`SymbolicModel`] is the validated, not-yet-compiled form of a model
//! document: symbol declarations, equation strings, the calibration and the
//! stochastic structure. It is built once per import and not modified
//! afterwards.

use crate::calibration::SymbolicCalibration;
use crate::covariance::CovarianceMatrix;
use crate::model_type::ModelType;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

/// A named, ordered list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedGroup {
    pub name: String,
    pub items: Vec<String>,
}

/// Ordered collection of named groups.
///
/// Both group order and the order of items within a group are preserved: for
/// symbols the position fixes the index in the vectors used by numeric code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupedNames {
    groups: Vec<NamedGroup>,
}

/// Symbol declarations, keyed by group (`states`, `controls`, `shocks`, ...).
pub type SymbolTable = GroupedNames;

/// Equation strings, keyed by equation group (`transition`, `arbitrage`, ...).
pub type SymbolicEquations = GroupedNames;

impl GroupedNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_groups(groups: Vec<(String, Vec<String>)>) -> Self {
        let mut grouped = Self::new();
        for (name, items) in groups {
            grouped.insert_group(name, items);
        }
        grouped
    }

    /// Add a group, replacing the items of an existing group with the same name.
    pub fn insert_group(&mut self, name: impl Into<String>, items: Vec<String>) {
        let name = name.into();
        match self.groups.iter_mut().find(|g| g.name == name) {
            Some(group) => group.items = items,
            None => self.groups.push(NamedGroup { name, items }),
        }
    }

    /// Rename a group in place, keeping its position and items.
    ///
    /// Any existing group already called `to` is replaced.
    /// Returns false if there is no group called `from`.
    pub fn rename_group(&mut self, from: &str, to: &str) -> bool {
        if from == to {
            return self.contains_group(from);
        }
        if !self.contains_group(from) {
            return false;
        }
        self.groups.retain(|g| g.name != to);
        if let Some(group) = self.groups.iter_mut().find(|g| g.name == from) {
            group.name = to.to_string();
        }
        true
    }

    pub fn contains_group(&self, name: &str) -> bool {
        self.groups.iter().any(|g| g.name == name)
    }

    pub fn group(&self, name: &str) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|g| g.name == name)
            .map(|g| g.items.as_slice())
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups
            .iter()
            .map(|g| (g.name.as_str(), g.items.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Tagged description of a stochastic process, e.g. `{Normal: [[0.01]]}` or
/// `{MarkovChain: [...]}`.
///
/// The parameters are left as raw document values since they may reference
/// calibrated symbols.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StochasticSpec {
    entries: Mapping,
}

/// Exogenous shock process of a model with continuous shocks.
pub type Distribution = StochasticSpec;

/// Transition of the discrete exogenous states of a Markov switching model.
pub type DiscreteTransition = StochasticSpec;

impl StochasticSpec {
    /// A spec with a single `tag: params` entry.
    pub fn new(tag: &str, params: Value) -> Self {
        let mut entries = Mapping::new();
        entries.insert(Value::from(tag), params);
        Self { entries }
    }

    pub fn from_mapping(entries: Mapping) -> Self {
        Self { entries }
    }

    /// The first tag of the spec (normally the only one).
    pub fn tag(&self) -> Option<&str> {
        self.entries.keys().next().and_then(|k| k.as_str())
    }

    /// Parameters stored under `tag`.
    pub fn params(&self, tag: &str) -> Option<&Value> {
        self.entries.get(tag)
    }

    pub fn entries(&self) -> &Mapping {
        &self.entries
    }
}

/// Metadata attached to a built model. It doesn't change the model's meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub filename: String,
    pub name: String,
    #[serde(rename = "type")]
    pub model_type: ModelType,
}

/// Validated symbolic representation of a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolicModel {
    name: String,
    model_type: ModelType,
    symbols: SymbolTable,
    equations: SymbolicEquations,
    calibration: SymbolicCalibration,
    covariances: Option<CovarianceMatrix>,
    distribution: Option<Distribution>,
    discrete_transition: Option<DiscreteTransition>,
    options: Option<Value>,
    definitions: Mapping,
}

/// Everything needed to assemble a [`SymbolicModel`].
///
/// All fields are expected to be validated already; assembling does no checks.
#[derive(Debug, Clone)]
pub struct SymbolicModelParts {
    pub name: String,
    pub model_type: ModelType,
    pub symbols: SymbolTable,
    pub equations: SymbolicEquations,
    pub calibration: SymbolicCalibration,
    pub covariances: Option<CovarianceMatrix>,
    pub distribution: Option<Distribution>,
    pub discrete_transition: Option<DiscreteTransition>,
    pub options: Option<Value>,
    pub definitions: Mapping,
}

impl SymbolicModel {
    pub fn new(parts: SymbolicModelParts) -> Self {
        Self {
            name: parts.name,
            model_type: parts.model_type,
            symbols: parts.symbols,
            equations: parts.equations,
            calibration: parts.calibration,
            covariances: parts.covariances,
            distribution: parts.distribution,
            discrete_transition: parts.discrete_transition,
            options: parts.options,
            definitions: parts.definitions,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model_type(&self) -> ModelType {
        self.model_type
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn equations(&self) -> &SymbolicEquations {
        &self.equations
    }

    pub fn calibration(&self) -> &SymbolicCalibration {
        &self.calibration
    }

    pub fn covariances(&self) -> Option<&CovarianceMatrix> {
        self.covariances.as_ref()
    }

    pub fn distribution(&self) -> Option<&Distribution> {
        self.distribution.as_ref()
    }

    pub fn discrete_transition(&self) -> Option<&DiscreteTransition> {
        self.discrete_transition.as_ref()
    }

    pub fn options(&self) -> Option<&Value> {
        self.options.as_ref()
    }

    pub fn definitions(&self) -> &Mapping {
        &self.definitions
    }

    /// Info record describing this model, loaded from `filename`.
    pub fn info(&self, filename: &str) -> ModelInfo {
        ModelInfo {
            filename: filename.to_string(),
            name: self.name.clone(),
            model_type: self.model_type,
        }
    }
}
