//! Media-type driven conversion between resources.
//!
//! A [`ResourceConverterChain`] holds converters in order; the first one
//! that accepts a `(from, into)` pair of media types does the work. The
//! [`Converters`] service builds the registries and the default chain once.
//!
//! ```
//! use thingraph_convert::{Converters, MemoryResource, StringResource};
//! use thingraph_media::MediaType;
//!
//! let converters = Converters::standard().unwrap();
//! let from = StringResource::new(
//!     "string:alice",
//!     MediaType::parse("text/turtle").unwrap(),
//!     "<https://example.org/alice> <https://schema.org/name> \"Alice\" .",
//! );
//! let into = MemoryResource::new("memory:alice", MediaType::parse("text/thing+yaml").unwrap());
//! converters.convert(&from, &into).unwrap();
//! assert!(into.text().unwrap().contains("identifier: https://example.org/alice"));
//! ```

pub mod chain;
pub mod config;
pub mod converter;
pub mod converters;
pub mod error;
pub mod resource;
pub mod service;
mod text;

pub use chain::{ResourceConverterChain, DEFAULT_MAX_DEPTH};
pub use config::ConvertConfig;
pub use converter::{ConversionContext, ResourceConverter};
pub use converters::{
    default_converters, IdentityResourceConverter, ThingFormat, ThingsResourceConverter,
    XmlResourceConverter, YamlJsonResourceConverter,
};
pub use error::{ConfigError, ConversionError, Result};
pub use resource::{FileResource, MemoryResource, ReadableResource, Resource, StringResource, WritableResource};
pub use service::Converters;
