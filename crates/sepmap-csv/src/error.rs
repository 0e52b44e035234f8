//! Error types for delimited-text mapping.

use std::path::PathBuf;

use sepmap_core::MapError;
use thiserror::Error;

/// Errors that can occur while reading or writing delimited text.
#[derive(Debug, Error)]
pub enum CsvMapError {
    // === Mapping Errors ===
    /// Registry lookup or cell conversion failed.
    #[error(transparent)]
    Map(#[from] MapError),

    // === Input/Output Errors ===
    /// Failed to open or create a file.
    #[error("failed to access file {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to hand rendered text to the caller's writer.
    #[error("failed to write CSV output: {0}")]
    Output(#[source] std::io::Error),

    /// Failed to read the header row.
    #[error("failed to read CSV header: {0}")]
    Header(#[source] csv::Error),

    /// Written output was not valid UTF-8.
    #[error("written CSV is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    // === Configuration Errors ===
    /// Separator options are unusable.
    #[error("invalid separator options: {message}")]
    InvalidOptions { message: String },

    /// Failed to parse an options file.
    #[error("failed to parse separator options: {0}")]
    Toml(#[from] toml::de::Error),
}

impl CsvMapError {
    pub(crate) fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::File {
            path: path.into(),
            source,
        }
    }
}

/// Errors from [`CsvRowSink`](crate::CsvRowSink).
#[derive(Debug, Error)]
pub enum CsvSinkError {
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("column '{column}' is not part of the header")]
    UnknownColumn { column: String },

    #[error("no row is open")]
    NoOpenRow,
}

/// Result type for delimited-text mapping operations.
pub type Result<T> = std::result::Result<T, CsvMapError>;
