//! Error types for resource conversion

use std::path::PathBuf;

use thingraph_media::MediaTypeError;
use thingraph_rdf::RdfError;

/// Errors from loading a [`crate::ConvertConfig`]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {detail}")]
    Parse { path: PathBuf, detail: String },

    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// Every converter declined the pair
    #[error("No converter from {from} into {into}")]
    NoConverter { from: String, into: String },

    /// Nested conversions went too deep or looped back to a pair in progress
    #[error("Conversion from {from} into {into} exceeds recursion limit at depth {depth}")]
    RecursionLimit {
        from: String,
        into: String,
        depth: usize,
    },

    #[error("I/O error on {iri}: {source}")]
    Io {
        iri: String,
        source: std::io::Error,
    },

    #[error("Cannot decode {iri} as {charset}")]
    Charset { iri: String, charset: String },

    /// Input that the selected format reader rejects
    #[error("Invalid {format} in {iri}: {message}")]
    Syntax {
        format: &'static str,
        iri: String,
        message: String,
    },

    #[error(transparent)]
    Rdf(#[from] RdfError),

    #[error(transparent)]
    MediaType(#[from] MediaTypeError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ConversionError {
    pub fn syntax(format: &'static str, iri: &str, message: impl ToString) -> Self {
        Self::Syntax {
            format,
            iri: iri.to_string(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConversionError>;
