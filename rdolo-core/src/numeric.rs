//! Wrapping of a symbolic model into a model-type specific representation.
//!
//! Compiling equations into numeric functions is the job of a downstream
//! backend. The default wrappers here only hold the symbolic model, its info
//! record and a working copy of the calibration.

use crate::calibration::{CalibrationValue, SymbolicCalibration};
use crate::errors::ImportResult;
use crate::model_type::ModelType;
use crate::symbolic::{ModelInfo, SymbolicModel};
use std::fmt;

/// Builds the variant models from a symbolic model and its info record.
pub trait VariantModelBuilder {
    /// Model built for `dtcscc` and `dtmscc` models.
    type Numeric;
    /// Model built for `dynare` models.
    type Dynare;

    fn build_numeric(&self, model: SymbolicModel, infos: ModelInfo)
        -> ImportResult<Self::Numeric>;

    fn build_dynare(&self, model: SymbolicModel, infos: ModelInfo) -> ImportResult<Self::Dynare>;
}

/// Result of an import.
#[derive(Debug, Clone)]
pub enum ImportedModel<N = NumericModel, D = DynareModel> {
    /// The symbolic model, returned when no wrapping was requested.
    Symbolic(SymbolicModel),
    Numeric(N),
    Dynare(D),
}

impl<N: VariantModel, D: VariantModel> ImportedModel<N, D> {
    pub fn symbolic(&self) -> &SymbolicModel {
        match self {
            ImportedModel::Symbolic(model) => model,
            ImportedModel::Numeric(model) => model.symbolic(),
            ImportedModel::Dynare(model) => model.symbolic(),
        }
    }

    pub fn model_type(&self) -> ModelType {
        self.symbolic().model_type()
    }
}

/// Routes a symbolic model to the builder matching its type.
pub fn wrap_model<B: VariantModelBuilder>(
    builder: &B,
    model: SymbolicModel,
    infos: ModelInfo,
) -> ImportResult<ImportedModel<B::Numeric, B::Dynare>> {
    if model.model_type().is_numeric() {
        builder.build_numeric(model, infos).map(ImportedModel::Numeric)
    } else {
        builder.build_dynare(model, infos).map(ImportedModel::Dynare)
    }
}

/// Common behaviour of the wrapped models.
pub trait VariantModel {
    fn symbolic(&self) -> &SymbolicModel;

    fn infos(&self) -> &ModelInfo;

    /// Current calibration, including any values set after import.
    fn calibration(&self) -> &SymbolicCalibration;

    fn calibration_mut(&mut self) -> &mut SymbolicCalibration;

    /// Calibrated values for `names`, in the same order.
    ///
    /// Returns `None` if any name has no calibration entry.
    fn get_calibration(&self, names: &[&str]) -> Option<Vec<CalibrationValue>> {
        names
            .iter()
            .map(|name| self.calibration().get(*name).cloned())
            .collect()
    }

    /// Overrides the calibration of `name`, returning the previous value.
    fn set_calibration(
        &mut self,
        name: &str,
        value: impl Into<CalibrationValue>,
    ) -> Option<CalibrationValue>
    where
        Self: Sized,
    {
        self.calibration_mut().insert(name.to_string(), value.into())
    }

    /// Numeric calibration of a symbol group, in declaration order.
    ///
    /// Returns `None` for unknown groups or if any value is still an expression.
    fn calibration_vector(&self, group: &str) -> Option<Vec<f64>> {
        let names = self.symbolic().symbols().group(group)?;
        names
            .iter()
            .map(|name| self.calibration().get(name).and_then(CalibrationValue::as_number))
            .collect()
    }
}

/// Model wrapper for `dtcscc` and `dtmscc` models.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericModel {
    symbolic: SymbolicModel,
    infos: ModelInfo,
    calibration: SymbolicCalibration,
}

impl NumericModel {
    pub fn new(symbolic: SymbolicModel, infos: ModelInfo) -> Self {
        let calibration = symbolic.calibration().clone();
        Self {
            symbolic,
            infos,
            calibration,
        }
    }
}

/// Model wrapper for `dynare` models.
#[derive(Debug, Clone, PartialEq)]
pub struct DynareModel {
    symbolic: SymbolicModel,
    infos: ModelInfo,
    calibration: SymbolicCalibration,
}

impl DynareModel {
    pub fn new(symbolic: SymbolicModel, infos: ModelInfo) -> Self {
        let calibration = symbolic.calibration().clone();
        Self {
            symbolic,
            infos,
            calibration,
        }
    }
}

impl VariantModel for NumericModel {
    fn symbolic(&self) -> &SymbolicModel {
        &self.symbolic
    }

    fn infos(&self) -> &ModelInfo {
        &self.infos
    }

    fn calibration(&self) -> &SymbolicCalibration {
        &self.calibration
    }

    fn calibration_mut(&mut self) -> &mut SymbolicCalibration {
        &mut self.calibration
    }
}

impl VariantModel for DynareModel {
    fn symbolic(&self) -> &SymbolicModel {
        &self.symbolic
    }

    fn infos(&self) -> &ModelInfo {
        &self.infos
    }

    fn calibration(&self) -> &SymbolicCalibration {
        &self.calibration
    }

    fn calibration_mut(&mut self) -> &mut SymbolicCalibration {
        &mut self.calibration
    }
}

/// Builds [`NumericModel`] and [`DynareModel`] wrappers.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultModelBuilder;

impl VariantModelBuilder for DefaultModelBuilder {
    type Numeric = NumericModel;
    type Dynare = DynareModel;

    fn build_numeric(&self, model: SymbolicModel, infos: ModelInfo) -> ImportResult<NumericModel> {
        Ok(NumericModel::new(model, infos))
    }

    fn build_dynare(&self, model: SymbolicModel, infos: ModelInfo) -> ImportResult<DynareModel> {
        Ok(DynareModel::new(model, infos))
    }
}

fn write_summary(
    f: &mut fmt::Formatter<'_>,
    model: &SymbolicModel,
    calibration: &SymbolicCalibration,
) -> fmt::Result {
    writeln!(f, "Model: {}", model.name())?;
    writeln!(f, "Type: {}", model.model_type())?;
    writeln!(f, "Symbols:")?;
    for (group, names) in model.symbols().iter() {
        writeln!(f, "  {group}: [{}]", names.join(", "))?;
    }
    writeln!(f, "Equations:")?;
    for (group, equations) in model.equations().iter() {
        writeln!(f, "  {group}:")?;
        for equation in equations {
            writeln!(f, "    {equation}")?;
        }
    }
    writeln!(f, "Calibration:")?;
    for (name, value) in calibration {
        writeln!(f, "  {name} = {value}")?;
    }
    Ok(())
}

impl fmt::Display for SymbolicModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_summary(f, self, self.calibration())
    }
}

impl fmt::Display for NumericModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_summary(f, &self.symbolic, &self.calibration)
    }
}

impl fmt::Display for DynareModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_summary(f, &self.symbolic, &self.calibration)
    }
}
