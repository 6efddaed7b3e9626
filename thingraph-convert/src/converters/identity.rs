//! Same media type on both ends: copy the bytes

use crate::converter::{ConversionContext, ResourceConverter};
use crate::error::Result;
use crate::resource::{ReadableResource, WritableResource};

#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityResourceConverter;

impl ResourceConverter for IdentityResourceConverter {
    fn name(&self) -> &'static str {
        "identity"
    }

    fn convert_into(
        &self,
        from: &dyn ReadableResource,
        into: &dyn WritableResource,
        ctx: &ConversionContext<'_>,
    ) -> Result<bool> {
        let (from_type, into_type) = (from.media_type(), into.media_type());
        if !ctx.media_types.normalized_eq(from_type, into_type) {
            return Ok(false);
        }
        // text in another charset is re-encoded
        match (from_type.charset(), into_type.charset()) {
            (Some(a), Some(b)) if a != b => into.write_text(&from.read_text()?)?,
            _ => into.write_bytes(&from.read_bytes()?)?,
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ResourceConverterChain;
    use crate::resource::MemoryResource;
    use thingraph_media::{MediaType, MediaTypeRegistry};
    use thingraph_model::{DatatypeRepository, NamespaceRepository};

    #[test]
    fn test_copies_and_reencodes() {
        let chain = ResourceConverterChain::new(vec![]);
        let registry = MediaTypeRegistry::standard().unwrap();
        let namespaces = NamespaceRepository::empty();
        let datatypes = DatatypeRepository::empty();
        let ctx = ConversionContext::new(&chain, &registry, &namespaces, &datatypes);

        let from = MemoryResource::with_bytes("memory:a", MediaType::new("text", "yaml"), b"a: 1".to_vec());
        let same = MemoryResource::new("memory:b", MediaType::new("application", "yaml"));
        assert!(IdentityResourceConverter.convert_into(&from, &same, &ctx).unwrap());
        assert_eq!(same.bytes(), b"a: 1");

        let utf8 = MemoryResource::with_bytes("memory:c", MediaType::new("text", "plain").with_charset("utf-8"), "é".into());
        let latin1 = MemoryResource::new("memory:d", MediaType::new("text", "plain").with_charset("iso-8859-1"));
        assert!(IdentityResourceConverter.convert_into(&utf8, &latin1, &ctx).unwrap());
        assert_eq!(latin1.bytes(), vec![0xE9]);

        let other = MemoryResource::new("memory:e", MediaType::new("text", "turtle"));
        assert!(!IdentityResourceConverter.convert_into(&from, &other, &ctx).unwrap());
    }
}
