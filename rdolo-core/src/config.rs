//! Importer configuration
//!
//! Settings are read from TOML. Every field has a default, so an empty file
//! (or no file at all) reproduces the historical import behaviour.

use crate::errors::{ImportError, ImportResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name given to models whose document has no `name` entry.
pub const DEFAULT_MODEL_NAME: &str = "anonymous";

/// Settings controlling how documents are imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Rewrite every `^` in the document text to `**` before parsing.
    ///
    /// The rewrite is textual and ignores quoting, so a literal `^` inside a
    /// quoted string is rewritten as well.
    ///
    /// Default: true
    pub rewrite_power_operator: bool,

    /// Name assigned to a model whose document doesn't provide one.
    ///
    /// Default: "anonymous"
    pub default_name: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            rewrite_power_operator: true,
            default_name: DEFAULT_MODEL_NAME.to_string(),
        }
    }
}

impl ImportConfig {
    pub fn from_toml_str(text: &str) -> ImportResult<Self> {
        toml::from_str(text).map_err(|e| ImportError::Config(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> ImportResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ImportError::Io {
            location: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}
