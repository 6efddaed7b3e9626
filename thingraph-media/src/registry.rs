//! Aggregated media-type knowledge
//!
//! Built once from a list of providers and then only read. There is no
//! process-wide instance; callers construct one and pass it by reference.

use std::collections::{BTreeMap, HashMap};

use tracing::trace;

use crate::error::{MediaTypeError, Result};
use crate::media_type::MediaType;
use crate::provider::{standard_providers, MediaTypeProvider};

#[derive(Debug, Clone, Default)]
pub struct MediaTypeRegistry {
    /// alternative spelling → canonical, both without parameters
    alternatives: HashMap<MediaType, MediaType>,
    known: Vec<MediaType>,
    /// lowercase extension without leading dot → canonical type
    extensions: BTreeMap<String, MediaType>,
}

impl MediaTypeRegistry {
    /// Aggregate `providers`; an extension claimed for two different types
    /// is rejected
    pub fn new<I>(providers: I) -> Result<Self>
    where
        I: IntoIterator<Item = Box<dyn MediaTypeProvider>>,
    {
        let mut registry = Self::default();
        for provider in providers {
            for (canonical, alternatives) in provider.known_types_with_alternatives() {
                let canonical = canonical.without_parameters();
                for alternative in alternatives {
                    registry
                        .alternatives
                        .insert(alternative.without_parameters(), canonical.clone());
                }
                if !registry.known.contains(&canonical) {
                    registry.known.push(canonical);
                }
            }
            for (extension, media_type) in provider.extensions_to_types() {
                let extension = extension.trim_start_matches('.').to_ascii_lowercase();
                let media_type = media_type.without_parameters();
                match registry.extensions.get(&extension) {
                    Some(existing) if *existing != media_type => {
                        return Err(MediaTypeError::AmbiguousExtension {
                            extension,
                            first: existing.clone(),
                            second: media_type,
                        });
                    }
                    Some(_) => {}
                    None => {
                        registry.extensions.insert(extension, media_type);
                    }
                }
            }
        }
        trace!(
            known = registry.known.len(),
            alternatives = registry.alternatives.len(),
            extensions = registry.extensions.len(),
            "built media type registry"
        );
        Ok(registry)
    }

    /// The registry of all built-in providers
    pub fn standard() -> Result<Self> {
        Self::new(standard_providers())
    }

    /// Built-in providers followed by `extra`
    pub fn with_standard<I>(extra: I) -> Result<Self>
    where
        I: IntoIterator<Item = Box<dyn MediaTypeProvider>>,
    {
        Self::new(standard_providers().into_iter().chain(extra))
    }

    /// Replace an alternative spelling with its canonical type, keeping
    /// parameters
    pub fn normalize(&self, media_type: &MediaType) -> MediaType {
        match self.alternatives.get(&media_type.without_parameters()) {
            Some(canonical) => media_type
                .parameters()
                .iter()
                .fold(canonical.clone(), |mt, (k, v)| mt.with_parameter(k, v)),
            None => media_type.clone(),
        }
    }

    /// Equal after normalization, ignoring parameters
    pub fn normalized_eq(&self, a: &MediaType, b: &MediaType) -> bool {
        self.normalize(a).essence_eq(&self.normalize(b))
    }

    /// Canonical types in registration order
    pub fn known_types(&self) -> &[MediaType] {
        &self.known
    }

    /// Type for the file name at the end of `path` (an IRI or a path)
    ///
    /// The longest registered suffix wins, so `a.thing.json` resolves via
    /// `thing.json` rather than `json`. Query and fragment are ignored.
    pub fn for_extension(&self, path: &str) -> Option<&MediaType> {
        let name = file_name(path).to_ascii_lowercase();
        self.extensions
            .iter()
            .filter(|(ext, _)| {
                name.len() > ext.len() + 1
                    && name.ends_with(ext.as_str())
                    && name.as_bytes()[name.len() - ext.len() - 1] == b'.'
            })
            .max_by_key(|(ext, _)| ext.len())
            .map(|(_, media_type)| media_type)
    }

    /// Extension registered for `media_type`, the shortest one if several
    pub fn extension_for(&self, media_type: &MediaType) -> Option<&str> {
        let wanted = self.normalize(media_type).without_parameters();
        self.extensions
            .iter()
            .filter(|(_, mt)| **mt == wanted)
            .min_by_key(|(ext, _)| ext.len())
            .map(|(ext, _)| ext.as_str())
    }
}

/// Last path segment, without query or fragment
pub(crate) fn file_name(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::StaticMediaTypes;

    fn registry() -> MediaTypeRegistry {
        MediaTypeRegistry::standard().unwrap()
    }

    #[test]
    fn test_longest_extension_wins() {
        let r = registry();
        assert_eq!(r.for_extension("data/people.thing.json").unwrap().essence(), "text/thing+json");
        assert_eq!(r.for_extension("data/people.json").unwrap().essence(), "application/json");
        assert_eq!(r.for_extension("file:///tmp/A.TTL?x=1#frag").unwrap().essence(), "text/turtle");
        assert!(r.for_extension("README").is_none());
        assert!(r.for_extension("json").is_none());
        assert!(r.for_extension("https://example.org/dir.json/").is_none());
    }

    #[test]
    fn test_normalize_keeps_parameters() {
        let r = registry();
        let yaml = MediaType::parse("text/x-yaml; charset=utf-16le").unwrap();
        let normalized = r.normalize(&yaml);
        assert_eq!(normalized.essence(), "application/yaml");
        assert_eq!(normalized.charset(), Some("utf-16le"));
        assert!(r.normalized_eq(&yaml, &MediaType::new("application", "yaml")));
        assert!(!r.normalized_eq(&yaml, &MediaType::new("application", "json")));

        let unknown = MediaType::new("application", "x-unknown");
        assert_eq!(r.normalize(&unknown), unknown);
    }

    #[test]
    fn test_conflicting_extension_is_rejected() {
        let extra = StaticMediaTypes::new().with_extension("json", MediaType::new("text", "other"));
        let err = MediaTypeRegistry::with_standard([Box::new(extra) as Box<dyn MediaTypeProvider>]).unwrap_err();
        assert!(matches!(err, MediaTypeError::AmbiguousExtension { ref extension, .. } if extension == "json"));

        // re-registering the same type is fine
        let same = StaticMediaTypes::new().with_extension("json", MediaType::new("application", "json"));
        assert!(MediaTypeRegistry::with_standard([Box::new(same) as Box<dyn MediaTypeProvider>]).is_ok());
    }

    #[test]
    fn test_extension_for() {
        let r = registry();
        assert_eq!(r.extension_for(&MediaType::new("application", "x-yaml")), Some("yml"));
        assert_eq!(r.extension_for(&MediaType::new("text", "turtle")), Some("ttl"));
        assert_eq!(r.extension_for(&MediaType::new("foo", "bar")), None);
    }
}
