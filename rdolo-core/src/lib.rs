//! Import of textual economic model descriptions into a validated symbolic model.
//!
//! A model document declares symbols, equations, a calibration and the
//! stochastic structure of a model. [`import::Importer`] turns such a
//! document into a [`symbolic::SymbolicModel`] and, optionally, wraps it in a
//! representation matching its model type.

pub mod calibration;
pub mod config;
pub mod covariance;
pub mod document;
pub mod import;
pub mod loader;
pub mod migration;
pub mod model_type;
pub mod normalize;
pub mod numeric;
pub mod parser;
pub mod sections;
pub mod symbolic;

pub mod errors;

pub use errors::{ImportError, ImportResult};
pub use import::{import_aggregate, yaml_import, Importer};
pub use model_type::ModelType;
pub use numeric::ImportedModel;
pub use symbolic::SymbolicModel;
