//! Resolution of a filename or URL to document text.

use crate::errors::{ImportError, ImportResult};
use log::debug;

/// Source of raw model documents.
pub trait DocumentLoader {
    /// Fetch the full text behind `location`.
    fn load(&self, location: &str) -> ImportResult<String>;
}

/// Loads documents from the local filesystem, or over http(s) for URLs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileOrUrlLoader;

impl FileOrUrlLoader {
    pub fn new() -> Self {
        Self
    }
}

pub(crate) fn is_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

impl DocumentLoader for FileOrUrlLoader {
    fn load(&self, location: &str) -> ImportResult<String> {
        if is_url(location) {
            debug!("Fetching model document from {}", location);
            fetch_url(location)
        } else {
            debug!("Reading model document from {}", location);
            std::fs::read_to_string(location).map_err(|source| ImportError::Io {
                location: location.to_string(),
                source,
            })
        }
    }
}

#[cfg(feature = "remote")]
fn fetch_url(url: &str) -> ImportResult<String> {
    let to_io = |e: reqwest::Error| ImportError::Io {
        location: url.to_string(),
        source: std::io::Error::other(e),
    };
    reqwest::blocking::get(url)
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.text())
        .map_err(to_io)
}

#[cfg(not(feature = "remote"))]
fn fetch_url(url: &str) -> ImportResult<String> {
    Err(ImportError::Io {
        location: url.to_string(),
        source: std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "built without the `remote` feature",
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_url_detection() {
        assert!(is_url("https://example.org/rbc.yaml"));
        assert!(is_url("http://example.org/rbc.yaml"));
        assert!(!is_url("models/rbc.yaml"));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name: rbc").unwrap();
        let text = FileOrUrlLoader::new()
            .load(file.path().to_str().unwrap())
            .unwrap();
        assert_eq!(text, "name: rbc\n");
    }

    #[test]
    fn test_missing_file() {
        let err = FileOrUrlLoader::new()
            .load("/definitely/not/here/model.yaml")
            .unwrap_err();
        match err {
            ImportError::Io { location, .. } => {
                assert_eq!(location, "/definitely/not/here/model.yaml")
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
