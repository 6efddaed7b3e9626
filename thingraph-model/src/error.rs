//! Error types for the value model

use crate::value::ValueKind;

/// Error raised by typed Thing accessors and literal conversion
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ThingError {
    /// An accessor asked for a kind of value that is not what is stored
    #[error("Type mismatch for <{predicate}>: expected {expected}, found {actual}")]
    TypeMismatch {
        predicate: String,
        expected: ValueKind,
        actual: ValueKind,
    },

    /// A literal's datatype is not known to the datatype repository
    #[error("Unknown datatype <{datatype}> for <{predicate}>")]
    UnknownDatatype { predicate: String, datatype: String },

    /// A literal did not parse under its datatype
    #[error(transparent)]
    Datatype(#[from] DatatypeError),
}

/// Error raised when a literal's text does not parse under its datatype
///
/// Recoverable: callers keep the raw `(text, datatype)` pair and continue.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Cannot convert {text:?} as <{datatype}>: {message}")]
pub struct DatatypeError {
    pub datatype: String,
    pub text: String,
    pub message: String,
}

impl DatatypeError {
    pub fn new(datatype: impl Into<String>, text: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            datatype: datatype.into(),
            text: text.into(),
            message: message.into(),
        }
    }
}

/// Error raised by Thing repositories
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    /// Only Things with an identifier can be stored
    #[error("Cannot store a Thing without identifier")]
    MissingIdentifier,

    /// Optimistic lock failure: the stored version moved on
    #[error("Version conflict for <{iri}>: expected {expected}, actual {actual}")]
    VersionConflict { iri: String, expected: u64, actual: u64 },

    /// A read-modify-write returned a Thing for another identifier
    #[error("Update of <{iri}> returned a Thing identified as <{actual}>")]
    IdentifierMismatch { iri: String, actual: String },

    /// Optimistic retries ran out
    #[error("Gave up on <{iri}> after {attempts} attempts")]
    RetriesExhausted { iri: String, attempts: usize },
}

/// Result type for value model operations
pub type Result<T> = std::result::Result<T, ThingError>;
