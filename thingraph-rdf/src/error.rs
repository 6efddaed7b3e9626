//! Error types for statement-level reading, import and export

use thingraph_graph_ir::BlankId;

/// Error raised while reading N-Triples or Turtle text
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// Invalid token
    #[error("Lexer error at position {position}: {message}")]
    Lexer { position: usize, message: String },

    /// Unexpected token or unsupported structure
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// Relative IRI without a base to resolve it against
    #[error("IRI resolution error: {0}")]
    IriResolution(String),

    #[error("Undefined prefix: {0}")]
    UndefinedPrefix(String),

    #[error("Invalid escape sequence: {0}")]
    InvalidEscape(String),
}

impl ParseError {
    pub fn lexer(position: usize, message: impl Into<String>) -> Self {
        Self::Lexer {
            position,
            message: message.into(),
        }
    }

    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }
}

/// Error raised while rebuilding Things from statements
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ImportError {
    /// A blank node is used as an object but never described
    #[error("Unresolved blank node reference {blank} (object of <{predicate}>)")]
    UnresolvedReference { blank: BlankId, predicate: String },

    /// A first/rest chain is broken
    #[error("Malformed collection at {blank}: {message}")]
    MalformedCollection { blank: BlankId, message: String },

    /// Blank nodes nest inside themselves
    #[error("Blank node {blank} contains itself")]
    Cycle { blank: BlankId },

    /// Language-tagged strings have no Value counterpart
    #[error("Language-tagged literal \"{lexical}\"@{language} on <{predicate}> is not supported")]
    LanguageTagged {
        predicate: String,
        lexical: String,
        language: String,
    },

    /// A statement whose subject or predicate has the wrong term kind
    #[error("Invalid statement: {0}")]
    InvalidStatement(String),
}

/// Error raised while emitting Things as statements
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExportError {
    /// Top-level Things need an identifier to become a subject
    #[error("Top-level thing #{index} has no identifier")]
    MissingIdentifier { index: usize },
}

/// Error raised while reading or writing JSON-LD documents
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum JsonLdError {
    #[error("Invalid JSON-LD: {0}")]
    Invalid(String),

    #[error("Unsupported JSON-LD feature: {0}")]
    Unsupported(String),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Any error of this crate
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RdfError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    JsonLd(#[from] JsonLdError),
}

/// Result type for this crate's convenience functions
pub type Result<T> = std::result::Result<T, RdfError>;
