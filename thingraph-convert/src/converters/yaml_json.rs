//! Plain JSON ⇄ YAML, without any Thing interpretation

use thingraph_media::media_type as mt;

use crate::converter::{ConversionContext, ResourceConverter};
use crate::error::{ConversionError, Result};
use crate::resource::{ReadableResource, WritableResource};

#[derive(Debug, Default, Clone, Copy)]
pub struct YamlJsonResourceConverter;

impl ResourceConverter for YamlJsonResourceConverter {
    fn name(&self) -> &'static str {
        "yaml-json"
    }

    fn convert_into(
        &self,
        from: &dyn ReadableResource,
        into: &dyn WritableResource,
        ctx: &ConversionContext<'_>,
    ) -> Result<bool> {
        let (from_type, into_type) = (from.media_type(), into.media_type());
        if ctx.is(from_type, mt::JSON) && ctx.is(into_type, mt::YAML) {
            let value: serde_json::Value = serde_json::from_str(&from.read_text()?)
                .map_err(|e| ConversionError::syntax("JSON", from.iri(), e.to_string()))?;
            let yaml = serde_yaml::to_string(&value)
                .map_err(|e| ConversionError::syntax("YAML", into.iri(), e.to_string()))?;
            into.write_text(&yaml)?;
            Ok(true)
        } else if ctx.is(from_type, mt::YAML) && ctx.is(into_type, mt::JSON) {
            let value: serde_json::Value = serde_yaml::from_str(&from.read_text()?)
                .map_err(|e| ConversionError::syntax("YAML", from.iri(), e.to_string()))?;
            let json = serde_json::to_string_pretty(&value)
                .map_err(|e| ConversionError::syntax("JSON", into.iri(), e.to_string()))?;
            into.write_text(&json)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ResourceConverterChain;
    use crate::resource::{MemoryResource, StringResource};
    use thingraph_media::{MediaType, MediaTypeRegistry};
    use thingraph_model::{DatatypeRepository, NamespaceRepository};

    fn convert(from: &StringResource, into: &MemoryResource) -> Result<bool> {
        let chain = ResourceConverterChain::new(vec![]);
        let registry = MediaTypeRegistry::standard().unwrap();
        let namespaces = NamespaceRepository::empty();
        let datatypes = DatatypeRepository::empty();
        let ctx = ConversionContext::new(&chain, &registry, &namespaces, &datatypes);
        YamlJsonResourceConverter.convert_into(from, into, &ctx)
    }

    #[test]
    fn test_json_to_yaml() {
        let from = StringResource::new("string:a.json", MediaType::new("application", "json"), r#"{"a": [1, "two"]}"#);
        let into = MemoryResource::new("memory:a.yaml", MediaType::new("text", "yaml"));
        assert!(convert(&from, &into).unwrap());
        assert_eq!(into.text().unwrap(), "a:\n- 1\n- two\n");
    }

    #[test]
    fn test_yaml_to_json() {
        let from = StringResource::new("string:a.yaml", MediaType::new("application", "x-yaml"), "a: [1, two]\n");
        let into = MemoryResource::new("memory:a.json", MediaType::new("application", "json"));
        assert!(convert(&from, &into).unwrap());
        let value: serde_json::Value = serde_json::from_slice(&into.bytes()).unwrap();
        assert_eq!(value, serde_json::json!({"a": [1, "two"]}));
    }

    #[test]
    fn test_declines_other_pairs() {
        let from = StringResource::new("string:a.json", MediaType::new("application", "json"), "{}");
        let into = MemoryResource::new("memory:a.json", MediaType::new("application", "json"));
        assert!(!convert(&from, &into).unwrap());
    }
}
