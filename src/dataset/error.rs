//! Error types for reading census files, metadata and feature records.

use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised while acquiring or reading input data.
///
/// All of these are fatal for a training run: there is no partial recovery
/// from a malformed file.
#[derive(Debug, Error)]
pub enum DataError {
    /// The file could not be read or written.
    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record does not have one field per column.
    #[error("{}:{line}: expected {expected} fields, found {found}", .path.display())]
    FieldCount {
        path: PathBuf,
        /// One-based line number in the source file
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A numeric column holds a value that is not an integer.
    #[error("{}:{line}: column '{column}' is not a valid integer: '{value}'", .path.display())]
    InvalidNumber {
        path: PathBuf,
        line: usize,
        column: String,
        value: String,
    },

    /// The file holds no records after skipping headers and blank lines.
    #[error("{} contains no records", .path.display())]
    Empty { path: PathBuf },

    /// The metadata document could not be parsed or written.
    #[error("Invalid metadata in {}: {source}", .path.display())]
    Meta {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The metadata does not describe the expected columns.
    #[error("Metadata lists {found} columns, data files have {expected}")]
    ColumnMismatch { expected: usize, found: usize },

    /// A feature record names a column the metadata does not know.
    #[error("Unknown feature '{0}'")]
    UnknownFeature(String),

    /// A feature record lacks a value for a required column.
    #[error("Missing value for feature '{0}'")]
    MissingFeature(String),

    /// A value is outside the known domain of a feature.
    #[error("'{value}' is not a valid value for '{column}'")]
    InvalidValue { column: String, value: String },

    /// A dataset file could not be fetched.
    #[error("Failed to download {url}: {message}")]
    Download { url: String, message: String },

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

impl DataError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DataError::Io {
            path: path.into(),
            source,
        }
    }
}
