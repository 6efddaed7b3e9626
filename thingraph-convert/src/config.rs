//! Conversion settings from a TOML file
//!
//! Every field is optional; absence means the built-in default.
//!
//! ```toml
//! max_depth = 8
//! default_charset = "utf-8"
//! list_encoding = "collection"
//!
//! [namespaces]
//! acme = "https://acme.example/vocab#"
//!
//! [extensions]
//! "acme.ttl" = "text/turtle"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thingraph_media::{MediaType, StaticMediaTypes};
use thingraph_model::NamespaceRepository;
use thingraph_rdf::ListEncoding;
use tracing::debug;

use crate::chain::DEFAULT_MAX_DEPTH;
use crate::error::ConfigError;

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConvertConfig {
    pub max_depth: Option<usize>,
    pub default_charset: Option<String>,
    /// `"repeated"` or `"collection"`
    pub list_encoding: Option<String>,

    /// `[namespaces]`: prefix → IRI, stored after the defaults
    pub namespaces: Option<BTreeMap<String, String>>,

    /// `[extensions]`: extension → media type
    pub extensions: Option<BTreeMap<String, String>>,
}

impl ConvertConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, Path::new("<string>"))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content, path)?;
        debug!(path = %path.display(), "loaded conversion config");
        Ok(config)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH)
    }

    pub fn default_charset(&self) -> &str {
        self.default_charset.as_deref().unwrap_or("utf-8")
    }

    pub fn list_encoding(&self) -> Result<ListEncoding, ConfigError> {
        match &self.list_encoding {
            Some(text) => text.parse().map_err(ConfigError::InvalidValue),
            None => Ok(ListEncoding::default()),
        }
    }

    /// Default namespaces plus the configured ones
    pub fn namespace_repository(&self) -> NamespaceRepository {
        self.namespaces
            .iter()
            .flatten()
            .fold(NamespaceRepository::defaults_builder(), |b, (prefix, iri)| {
                b.store(prefix.as_str(), iri.as_str())
            })
            .build()
    }

    /// Provider for the configured extensions
    pub fn media_type_provider(&self) -> Result<StaticMediaTypes, ConfigError> {
        let mut provider = StaticMediaTypes::new();
        for (extension, media_type) in self.extensions.iter().flatten() {
            let media_type = MediaType::parse(media_type)
                .map_err(|e| ConfigError::InvalidValue(format!("extension {}: {}", extension, e)))?;
            provider = provider.with_extension(extension, media_type);
        }
        Ok(provider)
    }
}
