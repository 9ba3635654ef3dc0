//! The import pipeline and its entry points.
//!
//! Importing runs a fixed sequence of stages, each taking the previous
//! stage's output:
//!
//! 1. load the document text (unless it was supplied)
//! 2. parse it into a [`RawDocument`]
//! 3. normalise the schema (aliases, defaults, legacy migration)
//! 4. resolve the model type
//! 5. validate the stochastic sections for that type
//! 6. fill in default calibration values
//! 7. build the covariance matrix
//! 8. assemble the [`SymbolicModel`]
//! 9. optionally wrap it in a numeric or Dynare-style model
//!
//! The first failing stage aborts the import with its error.

use crate::calibration::fill_calibration_defaults;
use crate::config::ImportConfig;
use crate::covariance::build_covariances;
use crate::document::RawDocument;
use crate::errors::ImportResult;
use crate::loader::{DocumentLoader, FileOrUrlLoader};
use crate::model_type::resolve_model_type;
use crate::normalize::{normalize, NormalizedDocument};
use crate::numeric::{wrap_model, DefaultModelBuilder, ImportedModel, VariantModelBuilder};
use crate::parser::parse_document;
use crate::sections::validate_sections;
use crate::symbolic::{SymbolicModel, SymbolicModelParts};
use log::debug;

/// Imports model documents.
///
/// ```no_run
/// use rdolo_core::import::Importer;
///
/// let model = Importer::new().import_symbolic("models/rbc.yaml", None).unwrap();
/// println!("{}", model.name());
/// ```
pub struct Importer {
    config: ImportConfig,
    loader: Box<dyn DocumentLoader>,
}

impl Default for Importer {
    fn default() -> Self {
        Self::new()
    }
}

impl Importer {
    /// Create an importer with the default configuration, reading from files or URLs.
    pub fn new() -> Self {
        Self {
            config: ImportConfig::default(),
            loader: Box::new(FileOrUrlLoader::new()),
        }
    }

    pub fn with_config(mut self, config: ImportConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a different source of document text.
    pub fn with_loader(mut self, loader: impl DocumentLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Parses the document at `location`, or `text` when it is given.
    pub fn read_document(&self, location: &str, text: Option<&str>) -> ImportResult<RawDocument> {
        let text = match text {
            Some(text) => text.to_string(),
            None => self.loader.load(location)?,
        };
        parse_document(&text, self.config.rewrite_power_operator)
    }

    /// Imports the document and returns the symbolic model.
    pub fn import_symbolic(&self, location: &str, text: Option<&str>) -> ImportResult<SymbolicModel> {
        let document = self.read_document(location, text)?;
        let normalized = normalize(document, &self.config)?;
        build_symbolic_model(normalized)
    }

    /// Imports the document and wraps it with the default model builder.
    pub fn import(&self, location: &str, text: Option<&str>) -> ImportResult<ImportedModel> {
        self.import_with(location, text, &DefaultModelBuilder)
    }

    /// Imports the document and wraps it with `builder`.
    pub fn import_with<B: VariantModelBuilder>(
        &self,
        location: &str,
        text: Option<&str>,
        builder: &B,
    ) -> ImportResult<ImportedModel<B::Numeric, B::Dynare>> {
        let model = self.import_symbolic(location, text)?;
        let infos = model.info(location);
        debug!("Wrapping '{}' as a {} model", infos.name, infos.model_type);
        wrap_model(builder, model, infos)
    }
}

/// Runs the validation stages on a normalised document and assembles the model.
pub fn build_symbolic_model(document: NormalizedDocument) -> ImportResult<SymbolicModel> {
    let model_type = resolve_model_type(document.declared_type, &document.symbols)?;
    let sections = validate_sections(model_type, &document)?;
    let calibration = fill_calibration_defaults(&document.calibration, &document.symbols);
    let covariances = build_covariances(document.covariances.as_ref())?;

    Ok(SymbolicModel::new(SymbolicModelParts {
        name: document.name,
        model_type,
        symbols: document.symbols,
        equations: document.equations,
        calibration,
        covariances,
        distribution: sections.distribution,
        discrete_transition: sections.discrete_transition,
        options: document.options,
        definitions: document.definitions,
    }))
}

/// Imports a model with the default settings.
///
/// `text` bypasses reading `location` when given. With `return_symbolic` the
/// symbolic model is returned as is; otherwise it is wrapped according to its
/// type.
pub fn yaml_import(
    location: &str,
    text: Option<&str>,
    return_symbolic: bool,
) -> ImportResult<ImportedModel> {
    let importer = Importer::new();
    if return_symbolic {
        importer
            .import_symbolic(location, text)
            .map(ImportedModel::Symbolic)
    } else {
        importer.import(location, text)
    }
}

/// Object built from a model document plus problem-specific aggregation data.
pub trait Aggregation: Sized {
    type Problems;

    fn from_document(document: RawDocument, problems: Self::Problems) -> ImportResult<Self>;
}

/// Reads a document with the standard parser and hands it to an [`Aggregation`].
pub fn import_aggregate<A: Aggregation>(
    location: &str,
    problems: A::Problems,
    text: Option<&str>,
) -> ImportResult<A> {
    let document = Importer::new().read_document(location, text)?;
    A::from_document(document, problems)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ImportError;
    use log::{LevelFilter, Log, Metadata, Record};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::thread::{self, ThreadId};

    /// Collects log messages together with the thread that emitted them, so
    /// tests running in parallel only look at their own records.
    struct CaptureLogger {
        records: Mutex<Vec<(ThreadId, String)>>,
    }

    impl Log for CaptureLogger {
        fn enabled(&self, _metadata: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            if let Ok(mut records) = self.records.lock() {
                records.push((thread::current().id(), record.args().to_string()));
            }
        }

        fn flush(&self) {}
    }

    static CAPTURE: CaptureLogger = CaptureLogger {
        records: Mutex::new(Vec::new()),
    };

    /// Messages logged by the current thread while running `f`.
    fn captured_messages(f: impl FnOnce()) -> Vec<String> {
        if log::set_logger(&CAPTURE).is_ok() {
            log::set_max_level(LevelFilter::Debug);
        }
        let id = thread::current().id();
        CAPTURE.records.lock().unwrap().retain(|(t, _)| *t != id);
        f();
        CAPTURE
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| *t == id)
            .map(|(_, message)| message.clone())
            .collect()
    }

    struct MemoryLoader(HashMap<String, String>);

    impl DocumentLoader for MemoryLoader {
        fn load(&self, location: &str) -> ImportResult<String> {
            self.0.get(location).cloned().ok_or_else(|| ImportError::Io {
                location: location.to_string(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        }
    }

    const MODEL: &str = r#"
name: growth
symbols: {states: [k], controls: [c], shocks: [e], parameters: [alpha]}
equations: {transition: ["k = k(-1)^alpha"]}
calibration: {alpha: 0.3}
distribution: {Normal: [[0.01]]}
"#;

    #[test]
    fn test_loader_is_used_without_text() {
        let loader = MemoryLoader(HashMap::from([("growth.yaml".to_string(), MODEL.to_string())]));
        let importer = Importer::new().with_loader(loader);
        let model = importer.import_symbolic("growth.yaml", None).unwrap();
        assert_eq!(model.name(), "growth");
        assert_eq!(
            model.equations().group("transition").unwrap()[0],
            "k = k(-1)**alpha"
        );

        let err = importer.import_symbolic("other.yaml", None).unwrap_err();
        assert!(matches!(err, ImportError::Io { .. }));
    }

    #[test]
    fn test_text_bypasses_loader() {
        let importer = Importer::new().with_loader(MemoryLoader(HashMap::new()));
        let model = importer.import_symbolic("growth.yaml", Some(MODEL)).unwrap();
        assert_eq!(model.name(), "growth");
    }

    #[test]
    fn test_power_rewrite_can_be_disabled() {
        let config = ImportConfig {
            rewrite_power_operator: false,
            ..ImportConfig::default()
        };
        let model = Importer::new()
            .with_config(config)
            .import_symbolic("growth.yaml", Some(MODEL))
            .unwrap();
        assert_eq!(
            model.equations().group("transition").unwrap()[0],
            "k = k(-1)^alpha"
        );
    }

    #[test]
    fn test_import_wraps_model() {
        let model = Importer::new().import("growth.yaml", Some(MODEL)).unwrap();
        match model {
            ImportedModel::Numeric(_) => {}
            _ => panic!("expected a numeric model"),
        }
    }

    #[test]
    fn test_inferred_type_and_default_name_are_reported() {
        let text = MODEL.replace("name: growth\n", "");
        let messages = captured_messages(|| {
            Importer::new().import_symbolic("growth.yaml", Some(&text)).unwrap();
        });
        assert!(
            messages.iter().any(|m| m == "Model type detected as 'dtcscc'"),
            "{messages:?}"
        );
        assert!(
            messages.iter().any(|m| m == "Missing model name. Set as 'anonymous'"),
            "{messages:?}"
        );
    }

    #[test]
    fn test_declared_type_is_not_reported() {
        let text = format!("model_type: dtcscc\n{MODEL}");
        let messages = captured_messages(|| {
            Importer::new().import_symbolic("growth.yaml", Some(&text)).unwrap();
        });
        assert!(
            !messages.iter().any(|m| m.starts_with("Model type detected")),
            "{messages:?}"
        );
        assert!(
            !messages.iter().any(|m| m.starts_with("Missing model name")),
            "{messages:?}"
        );
    }

    struct SymbolCount {
        groups: usize,
        label: String,
    }

    impl Aggregation for SymbolCount {
        type Problems = String;

        fn from_document(document: RawDocument, problems: String) -> ImportResult<Self> {
            let groups = document
                .get("symbols")
                .and_then(|s| s.as_mapping())
                .map(|s| s.len())
                .unwrap_or(0);
            Ok(Self {
                groups,
                label: problems,
            })
        }
    }

    #[test]
    fn test_import_aggregate() {
        let agg: SymbolCount = import_aggregate("growth.yaml", "p".to_string(), Some(MODEL)).unwrap();
        assert_eq!(agg.groups, 4);
        assert_eq!(agg.label, "p");
    }
}
