use crate::model_type::ModelType;
use thiserror::Error;

/// Error type for a failed model import.
///
/// Every stage of the import pipeline fails fast with one of these variants.
/// Nothing is caught internally, so the first problem found is the one reported.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The document could not be fetched from disk or over the network.
    #[error("Could not read '{location}': {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },
    /// The text is not well-formed, or a legacy covariance literal is malformed.
    #[error("Could not parse {what}: {details}")]
    Parse { what: String, details: String },
    /// A mandatory section is absent, possibly only for the resolved model type.
    #[error("{}", missing_section_message(.section, .model_type))]
    MissingSection {
        section: String,
        model_type: Option<ModelType>,
    },
    /// The model type was neither declared correctly nor inferable.
    #[error("{0}")]
    ModelType(String),
    /// Covariance data is not a square two-dimensional matrix.
    #[error("{0}")]
    CovarianceShape(String),
    /// A field holds a value of the wrong kind.
    #[error("Invalid value at '{path}': expected {expected}, found {found}")]
    InvalidField {
        path: String,
        expected: String,
        found: String,
    },
    /// The importer configuration could not be read.
    #[error("Invalid importer configuration: {0}")]
    Config(String),
}

impl ImportError {
    pub(crate) fn missing(section: &str) -> Self {
        ImportError::MissingSection {
            section: section.to_string(),
            model_type: None,
        }
    }

    pub(crate) fn missing_for(section: &str, model_type: ModelType) -> Self {
        ImportError::MissingSection {
            section: section.to_string(),
            model_type: Some(model_type),
        }
    }

    pub(crate) fn parse(what: impl Into<String>, details: impl ToString) -> Self {
        ImportError::Parse {
            what: what.into(),
            details: details.to_string(),
        }
    }
}

fn missing_section_message(section: &str, model_type: &Option<ModelType>) -> String {
    match model_type {
        Some(model_type) => format!("Missing section (model type {model_type}): '{section}'."),
        None => format!("Missing section: '{section}'."),
    }
}

/// Convenience type for `Result<T, ImportError>`.
pub type ImportResult<T> = Result<T, ImportError>;
