//! Error types for attendance ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading an attendance export.
///
/// A missing section or header row is not an error: the parser returns an
/// empty record list and leaves the decision to the caller.
#[derive(Debug, Error)]
pub enum IngestError {
    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file starts with a byte-order mark of an encoding other than UTF-8.
    #[error("unsupported encoding {encoding} in {path}, re-export as UTF-8")]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },

    /// Malformed CSV or invalid UTF-8.
    #[error("failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl IngestError {
    pub(crate) fn open(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/path/to/export.csv"),
        };
        assert_eq!(err.to_string(), "CSV file not found: /path/to/export.csv");
    }

    #[test]
    fn test_open_error_classification() {
        let path = std::path::Path::new("export.csv");
        let missing = IngestError::open(path, std::io::Error::from(std::io::ErrorKind::NotFound));
        assert!(matches!(missing, IngestError::FileNotFound { .. }));
        let denied = IngestError::open(
            path,
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(denied, IngestError::FileRead { .. }));
    }
}
