//! Media-type providers
//!
//! A provider contributes canonical media types, the alternative spellings
//! that normalize to them, and the file extensions that map to them.
//! Providers are aggregated once by [`crate::MediaTypeRegistry::new`].

use crate::media_type::{self as mt, MediaType};

pub trait MediaTypeProvider: Send + Sync {
    /// Canonical types with the spellings that normalize to them
    fn known_types_with_alternatives(&self) -> Vec<(MediaType, Vec<MediaType>)> {
        Vec::new()
    }

    /// Extensions (without the leading dot, possibly multi-part such as
    /// `thing.json`) mapped to their canonical type
    fn extensions_to_types(&self) -> Vec<(String, MediaType)>;
}

/// Parse a built-in `type/subtype` constant
fn essence(s: &str) -> MediaType {
    let (type_, subtype) = s.split_once('/').unwrap_or((s, ""));
    MediaType::new(type_, subtype)
}

fn extensions(pairs: &[(&str, &str)]) -> Vec<(String, MediaType)> {
    pairs
        .iter()
        .map(|(ext, media_type)| (ext.to_string(), essence(media_type)))
        .collect()
}

/// Common web and document types
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardMediaTypes;

impl MediaTypeProvider for StandardMediaTypes {
    fn known_types_with_alternatives(&self) -> Vec<(MediaType, Vec<MediaType>)> {
        vec![
            (essence(mt::JSON), vec![essence("text/json")]),
            (essence(mt::XML), vec![essence("text/xml")]),
            (essence("text/markdown"), vec![essence("text/x-markdown")]),
            (essence(mt::CBOR), vec![]),
        ]
    }

    fn extensions_to_types(&self) -> Vec<(String, MediaType)> {
        extensions(&[
            ("txt", mt::TEXT_PLAIN),
            ("json", mt::JSON),
            ("xml", mt::XML),
            ("html", "text/html"),
            ("htm", "text/html"),
            ("csv", "text/csv"),
            ("md", "text/markdown"),
            ("cbor", mt::CBOR),
            ("pdf", "application/pdf"),
            ("png", "image/png"),
            ("gif", "image/gif"),
            ("jpg", "image/jpeg"),
            ("jpeg", "image/jpeg"),
            ("zip", "application/zip"),
            ("gz", "application/gzip"),
            ("bin", mt::OCTET_STREAM),
        ])
    }
}

/// YAML and its historical spellings
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlMediaTypes;

impl MediaTypeProvider for YamlMediaTypes {
    fn known_types_with_alternatives(&self) -> Vec<(MediaType, Vec<MediaType>)> {
        vec![(
            essence(mt::YAML),
            vec![
                essence("text/yaml"),
                essence("text/x-yaml"),
                essence("application/x-yaml"),
            ],
        )]
    }

    fn extensions_to_types(&self) -> Vec<(String, MediaType)> {
        extensions(&[("yaml", mt::YAML), ("yml", mt::YAML)])
    }
}

/// Statement-based serializations
#[derive(Debug, Default, Clone, Copy)]
pub struct RdfMediaTypes;

impl MediaTypeProvider for RdfMediaTypes {
    fn known_types_with_alternatives(&self) -> Vec<(MediaType, Vec<MediaType>)> {
        vec![
            (essence(mt::TURTLE), vec![essence("application/x-turtle")]),
            (essence(mt::N_TRIPLES), vec![essence("text/n-triples")]),
            (essence(mt::JSON_LD), vec![]),
        ]
    }

    fn extensions_to_types(&self) -> Vec<(String, MediaType)> {
        extensions(&[("ttl", mt::TURTLE), ("nt", mt::N_TRIPLES), ("jsonld", mt::JSON_LD)])
    }
}

/// Things in their wire shape
#[derive(Debug, Default, Clone, Copy)]
pub struct ThingMediaTypes;

impl MediaTypeProvider for ThingMediaTypes {
    fn known_types_with_alternatives(&self) -> Vec<(MediaType, Vec<MediaType>)> {
        vec![
            (essence(mt::THING_JSON), vec![essence("application/thing+json")]),
            (essence(mt::THING_YAML), vec![essence("application/thing+yaml")]),
            (essence(mt::THING_CBOR), vec![]),
        ]
    }

    fn extensions_to_types(&self) -> Vec<(String, MediaType)> {
        extensions(&[
            ("thing.json", mt::THING_JSON),
            ("thing.yaml", mt::THING_YAML),
            ("thing.yml", mt::THING_YAML),
            ("thing.cbor", mt::THING_CBOR),
        ])
    }
}

/// Provider assembled at runtime, typically from configuration
#[derive(Debug, Default, Clone)]
pub struct StaticMediaTypes {
    known: Vec<(MediaType, Vec<MediaType>)>,
    extensions: Vec<(String, MediaType)>,
}

impl StaticMediaTypes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extension(mut self, extension: &str, media_type: MediaType) -> Self {
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();
        self.extensions.push((extension, media_type.without_parameters()));
        self
    }

    pub fn with_alternatives(mut self, canonical: MediaType, alternatives: Vec<MediaType>) -> Self {
        self.known.push((canonical, alternatives));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty() && self.extensions.is_empty()
    }
}

impl MediaTypeProvider for StaticMediaTypes {
    fn known_types_with_alternatives(&self) -> Vec<(MediaType, Vec<MediaType>)> {
        self.known.clone()
    }

    fn extensions_to_types(&self) -> Vec<(String, MediaType)> {
        self.extensions.clone()
    }
}

/// The built-in providers, in registration order
pub fn standard_providers() -> Vec<Box<dyn MediaTypeProvider>> {
    vec![
        Box::new(StandardMediaTypes),
        Box::new(YamlMediaTypes),
        Box::new(RdfMediaTypes),
        Box::new(ThingMediaTypes),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_extensions_have_no_parameters() {
        for provider in standard_providers() {
            for (ext, media_type) in provider.extensions_to_types() {
                assert!(!ext.starts_with('.'), "{}", ext);
                assert!(media_type.parameters().is_empty(), "{}", media_type);
            }
        }
    }

    #[test]
    fn test_static_provider() {
        let provider = StaticMediaTypes::new()
            .with_extension(".Proto", MediaType::new("text", "proto").with_charset("utf-8"))
            .with_alternatives(MediaType::new("text", "proto"), vec![MediaType::new("text", "x-proto")]);
        assert_eq!(
            provider.extensions_to_types(),
            vec![("proto".to_string(), MediaType::new("text", "proto"))]
        );
        assert_eq!(provider.known_types_with_alternatives().len(), 1);
        assert!(!provider.is_empty());
    }
}
