//! Error types for rule registration and row conversion.

use std::any::type_name;
use std::fmt::Display;

use thiserror::Error;

/// Boxed error produced by user converters and row collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A single cell that could not be converted in either direction.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Generic coercion from text failed.
    #[error("cannot parse {text:?} as {target}: {reason}")]
    Parse {
        text: String,
        target: &'static str,
        reason: String,
    },

    /// A caller-supplied parse or format function failed.
    #[error("{source}")]
    Custom {
        #[source]
        source: BoxError,
    },
}

impl ConvertError {
    pub(crate) fn parse<P>(text: &str, reason: impl Display) -> Self {
        Self::Parse {
            text: text.to_string(),
            target: type_name::<P>(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn custom(source: impl Into<BoxError>) -> Self {
        Self::Custom {
            source: source.into(),
        }
    }
}

/// Errors surfaced by the registry and the read/write pipeline.
#[derive(Debug, Error)]
pub enum MapError {
    // === Registration Errors ===
    /// Read or Write called for a type with no rule set.
    #[error("no mapping registered for type {type_name}")]
    UnregisteredType { type_name: &'static str },

    /// The same column was added twice to one rule set.
    #[error("column '{column}' is already mapped for type {type_name}")]
    DuplicateColumn {
        column: String,
        type_name: &'static str,
    },

    // === Conversion Errors ===
    /// A cell could not be converted; aborts the whole call.
    #[error("failed to convert column '{column}' at row {row} for type {type_name}: {source}")]
    Conversion {
        type_name: &'static str,
        column: String,
        row: usize,
        #[source]
        source: ConvertError,
    },

    // === Collaborator Errors ===
    /// The row source failed while producing a row.
    #[error("row source failed at row {row}: {source}")]
    Source {
        row: usize,
        #[source]
        source: BoxError,
    },

    /// The row sink rejected a header, cell or row.
    #[error("row sink failed: {source}")]
    Sink {
        #[source]
        source: BoxError,
    },
}

impl MapError {
    pub(crate) fn unregistered<T>() -> Self {
        Self::UnregisteredType {
            type_name: type_name::<T>(),
        }
    }

    pub(crate) fn conversion<T>(column: &str, row: usize, source: ConvertError) -> Self {
        Self::Conversion {
            type_name: type_name::<T>(),
            column: column.to_string(),
            row,
            source,
        }
    }

    pub(crate) fn row_source(row: usize, source: impl Into<BoxError>) -> Self {
        Self::Source {
            row,
            source: source.into(),
        }
    }

    pub(crate) fn row_sink(source: impl Into<BoxError>) -> Self {
        Self::Sink {
            source: source.into(),
        }
    }
}
