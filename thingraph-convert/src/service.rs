//! The conversion service: registries and chain built once, shared by
//! every request

use std::path::Path;

use thingraph_media::{MediaTypeDetector, MediaTypeProvider, MediaTypeRegistry};
use thingraph_model::{DatatypeRepository, NamespaceRepository};
use thingraph_rdf::ListEncoding;
use tracing::{debug, info};

use crate::chain::ResourceConverterChain;
use crate::config::ConvertConfig;
use crate::converter::ConversionContext;
use crate::converters::default_converters;
use crate::error::Result;
use crate::resource::{FileResource, ReadableResource, WritableResource};

pub struct Converters {
    chain: ResourceConverterChain,
    media_types: MediaTypeRegistry,
    namespaces: NamespaceRepository,
    datatypes: DatatypeRepository,
    list_encoding: ListEncoding,
    default_charset: String,
}

impl Converters {
    /// Built-in registries and converters with default settings
    pub fn standard() -> Result<Self> {
        Self::from_config(&ConvertConfig::default())
    }

    pub fn from_config(config: &ConvertConfig) -> Result<Self> {
        let extra: Box<dyn MediaTypeProvider> = Box::new(config.media_type_provider()?);
        let media_types = MediaTypeRegistry::with_standard([extra])?;
        let chain = ResourceConverterChain::new(default_converters()).with_max_depth(config.max_depth());
        let converters = Self {
            chain,
            media_types,
            namespaces: config.namespace_repository(),
            datatypes: DatatypeRepository::standard(),
            list_encoding: config.list_encoding()?,
            default_charset: config.default_charset().to_ascii_lowercase(),
        };
        info!(
            converters = ?converters.chain.names().collect::<Vec<_>>(),
            namespaces = converters.namespaces.len(),
            max_depth = converters.chain.max_depth(),
            "conversion service ready"
        );
        Ok(converters)
    }

    pub fn chain(&self) -> &ResourceConverterChain {
        &self.chain
    }

    pub fn media_types(&self) -> &MediaTypeRegistry {
        &self.media_types
    }

    pub fn namespaces(&self) -> &NamespaceRepository {
        &self.namespaces
    }

    pub fn datatypes(&self) -> &DatatypeRepository {
        &self.datatypes
    }

    pub fn list_encoding(&self) -> ListEncoding {
        self.list_encoding
    }

    pub fn detector(&self) -> MediaTypeDetector<'_> {
        MediaTypeDetector::new(&self.media_types).with_default_charset(&self.default_charset)
    }

    /// A file resource whose media type is detected from its name and content
    pub fn file(&self, path: impl AsRef<Path>) -> FileResource {
        FileResource::detect(path, &self.detector())
    }

    /// A fresh top-level context for one request
    pub fn context(&self) -> ConversionContext<'_> {
        ConversionContext::new(&self.chain, &self.media_types, &self.namespaces, &self.datatypes)
            .with_list_encoding(self.list_encoding)
    }

    pub fn convert(&self, from: &dyn ReadableResource, into: &dyn WritableResource) -> Result<()> {
        debug!(from = from.iri(), into = into.iri(), "conversion requested");
        self.chain.convert(from, into, &self.context())
    }
}
