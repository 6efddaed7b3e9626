//! The converter interface and the per-request context

use thingraph_media::{MediaType, MediaTypeRegistry};
use thingraph_model::{DatatypeRepository, NamespaceRepository};
use thingraph_rdf::ListEncoding;

use crate::chain::ResourceConverterChain;
use crate::error::Result;
use crate::resource::{ReadableResource, WritableResource};

/// One format adapter in a [`ResourceConverterChain`]
///
/// `convert_into` returns `Ok(false)` when the pair of media types is not
/// one this converter handles; it must check that before touching either
/// resource. `Ok(true)` means `into` now holds the converted content. Errors
/// are reserved for input the converter accepted but could not process.
pub trait ResourceConverter: Send + Sync {
    /// Short name for log events
    fn name(&self) -> &'static str;

    fn convert_into(
        &self,
        from: &dyn ReadableResource,
        into: &dyn WritableResource,
        ctx: &ConversionContext<'_>,
    ) -> Result<bool>;
}

/// Everything a converter may consult, passed explicitly per request
#[derive(Clone)]
pub struct ConversionContext<'a> {
    pub media_types: &'a MediaTypeRegistry,
    pub namespaces: &'a NamespaceRepository,
    pub datatypes: &'a DatatypeRepository,
    pub list_encoding: ListEncoding,
    chain: &'a ResourceConverterChain,
    depth: usize,
    /// `(from, into)` essences of the conversions in progress
    visited: Vec<(MediaType, MediaType)>,
}

impl<'a> ConversionContext<'a> {
    pub fn new(
        chain: &'a ResourceConverterChain,
        media_types: &'a MediaTypeRegistry,
        namespaces: &'a NamespaceRepository,
        datatypes: &'a DatatypeRepository,
    ) -> Self {
        Self {
            media_types,
            namespaces,
            datatypes,
            list_encoding: ListEncoding::default(),
            chain,
            depth: 0,
            visited: Vec::new(),
        }
    }

    pub fn with_list_encoding(mut self, list_encoding: ListEncoding) -> Self {
        self.list_encoding = list_encoding;
        self
    }

    /// Number of chain invocations enclosing this one
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn is_visiting(&self, pair: &(MediaType, MediaType)) -> bool {
        self.visited.contains(pair)
    }

    pub(crate) fn enter(&self, pair: (MediaType, MediaType)) -> Self {
        let mut nested = self.clone();
        nested.depth += 1;
        nested.visited.push(pair);
        nested
    }

    /// Normalized media type without parameters
    pub fn essence(&self, media_type: &MediaType) -> MediaType {
        self.media_types.normalize(media_type).without_parameters()
    }

    /// Whether `media_type` normalizes to the type named by `essence`
    pub fn is(&self, media_type: &MediaType, essence: &str) -> bool {
        self.essence(media_type).essence() == essence
    }

    /// Run the chain again from inside a converter
    pub fn convert(&self, from: &dyn ReadableResource, into: &dyn WritableResource) -> Result<()> {
        self.chain.convert(from, into, self)
    }
}
