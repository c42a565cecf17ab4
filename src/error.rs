//! Error types for the bibtex-refman crate

use crate::model::{FieldName, ReferenceKind};
use thiserror::Error;

/// Result type for bibtex-refman operations
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for bibtex-refman
#[derive(Error, Debug)]
pub enum Error {
    /// A field value was rejected at the point of assignment.
    ///
    /// The display text is the bare reason so the interactive collector can
    /// print it verbatim before re-prompting.
    #[error("{reason}")]
    InvalidField {
        /// Field that rejected the value
        field: FieldName,
        /// The rejected value
        value: String,
        /// Human readable reason
        reason: &'static str,
    },

    /// Missing required field at serialization time
    #[error("Missing required field '{field}' in {kind} reference")]
    MissingRequiredField {
        /// The reference kind
        kind: ReferenceKind,
        /// The missing field
        field: FieldName,
    },

    /// Field is not carried by this reference kind
    #[error("Field '{field}' is not supported by {kind} references")]
    UnsupportedField {
        /// The reference kind
        kind: ReferenceKind,
        /// The offending field
        field: FieldName,
    },

    /// Invalid reference kind
    #[error("Invalid reference type '{0}'")]
    InvalidEntryType(String),

    /// Unknown filter criterion
    #[error("Unknown filter criterion '{0}' (expected author, journal, year or title)")]
    UnknownCriterion(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// Build an [`Error::InvalidField`]
    pub(crate) fn invalid(field: FieldName, value: &str, reason: &'static str) -> Self {
        Self::InvalidField {
            field,
            value: value.to_string(),
            reason,
        }
    }

    /// Whether this error came from a field validator
    #[must_use]
    pub const fn is_invalid_field(&self) -> bool {
        matches!(self, Self::InvalidField { .. })
    }
}
