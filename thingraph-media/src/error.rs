//! Error types for media-type parsing and registry construction

use crate::media_type::MediaType;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MediaTypeError {
    #[error("Invalid media type {input:?}: {message}")]
    Parse { input: String, message: String },

    /// Two providers map one extension to different types
    #[error("Extension .{extension} maps to both {first} and {second}")]
    AmbiguousExtension {
        extension: String,
        first: MediaType,
        second: MediaType,
    },
}

impl MediaTypeError {
    pub fn parse(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MediaTypeError>;
