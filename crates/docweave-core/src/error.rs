//! Error types for docweave.
//!
//! Fatal errors are limited to the directory-existence checks at the start
//! of a run; everything per-file is collected into report lists instead of
//! propagating.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the docweave library.
#[derive(Debug, Error)]
pub enum DocweaveError {
    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // Migration errors
    #[error("Rename collision on {target}: sources [{}]", .sources.join(", "))]
    RenameCollision {
        target: String,
        sources: Vec<String>,
    },
}

/// Result type alias for docweave operations.
pub type Result<T> = std::result::Result<T, DocweaveError>;

// Conversion implementations for common error types

impl From<std::io::Error> for DocweaveError {
    fn from(err: std::io::Error) -> Self {
        DocweaveError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for DocweaveError {
    fn from(err: serde_json::Error) -> Self {
        DocweaveError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl DocweaveError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        DocweaveError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }
}
