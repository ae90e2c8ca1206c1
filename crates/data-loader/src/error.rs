//! Error types for the data-loader crate.
//!
//! Every variant is fatal at startup: a process that fails to load its
//! catalog or similarity matrix must not serve recommendations.

use thiserror::Error;

/// Errors that can occur while loading the catalog and similarity matrix
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Line in the catalog file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// The similarity blob is truncated or has trailing bytes
    #[error("Corrupt similarity matrix in {path}: {reason}")]
    CorruptMatrix { path: String, reason: String },

    /// Catalog size and matrix dimension disagree
    #[error("Catalog has {catalog} movies but similarity matrix is {matrix}x{matrix}")]
    DimensionMismatch { catalog: usize, matrix: usize },

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
