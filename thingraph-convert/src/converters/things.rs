//! Any Thing-capable format into any other
//!
//! Readers and writers exist for Turtle, N-Triples, JSON-LD and the Thing
//! wire shape as JSON, YAML or CBOR. The wire-shape formats hold either one
//! Thing or an array of Things; they are always written as an array.

use serde::Deserialize;
use thingraph_media::media_type as mt;
use thingraph_media::MediaType;
use thingraph_model::Thing;
use thingraph_rdf::{from_jsonld, things_from_text, things_to_ntriples, things_to_turtle, to_jsonld, RdfError};
use tracing::debug;

use crate::converter::{ConversionContext, ResourceConverter};
use crate::error::{ConversionError, Result};
use crate::resource::{ReadableResource, WritableResource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThingFormat {
    Turtle,
    NTriples,
    JsonLd,
    ThingJson,
    ThingYaml,
    ThingCbor,
}

impl ThingFormat {
    pub const ALL: [ThingFormat; 6] = [
        ThingFormat::Turtle,
        ThingFormat::NTriples,
        ThingFormat::JsonLd,
        ThingFormat::ThingJson,
        ThingFormat::ThingYaml,
        ThingFormat::ThingCbor,
    ];

    pub fn essence(self) -> &'static str {
        match self {
            ThingFormat::Turtle => mt::TURTLE,
            ThingFormat::NTriples => mt::N_TRIPLES,
            ThingFormat::JsonLd => mt::JSON_LD,
            ThingFormat::ThingJson => mt::THING_JSON,
            ThingFormat::ThingYaml => mt::THING_YAML,
            ThingFormat::ThingCbor => mt::THING_CBOR,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ThingFormat::Turtle => "Turtle",
            ThingFormat::NTriples => "N-Triples",
            ThingFormat::JsonLd => "JSON-LD",
            ThingFormat::ThingJson => "Thing JSON",
            ThingFormat::ThingYaml => "Thing YAML",
            ThingFormat::ThingCbor => "Thing CBOR",
        }
    }

    pub fn for_media_type(media_type: &MediaType, ctx: &ConversionContext<'_>) -> Option<Self> {
        Self::ALL.into_iter().find(|f| ctx.is(media_type, f.essence()))
    }
}

/// One Thing or many, as found in a wire-shape document
#[derive(Deserialize)]
#[serde(untagged)]
enum ThingDocument {
    Many(Vec<Thing>),
    One(Thing),
}

impl From<ThingDocument> for Vec<Thing> {
    fn from(doc: ThingDocument) -> Self {
        match doc {
            ThingDocument::Many(things) => things,
            ThingDocument::One(thing) => vec![thing],
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThingsResourceConverter;

impl ThingsResourceConverter {
    pub fn read(
        format: ThingFormat,
        from: &dyn ReadableResource,
        ctx: &ConversionContext<'_>,
    ) -> Result<Vec<Thing>> {
        let syntax = |message: String| ConversionError::syntax(format.label(), from.iri(), message);
        let things = match format {
            ThingFormat::Turtle | ThingFormat::NTriples => things_from_text(&from.read_text()?, ctx.datatypes)?,
            ThingFormat::JsonLd => {
                let doc: serde_json::Value = serde_json::from_str(&from.read_text()?).map_err(|e| syntax(e.to_string()))?;
                from_jsonld(&doc).map_err(RdfError::from)?
            }
            ThingFormat::ThingJson => serde_json::from_str::<ThingDocument>(&from.read_text()?)
                .map_err(|e| syntax(e.to_string()))?
                .into(),
            ThingFormat::ThingYaml => serde_yaml::from_str::<ThingDocument>(&from.read_text()?)
                .map_err(|e| syntax(e.to_string()))?
                .into(),
            ThingFormat::ThingCbor => ciborium::de::from_reader::<ThingDocument, _>(from.read_bytes()?.as_slice())
                .map_err(|e| syntax(e.to_string()))?
                .into(),
        };
        Ok(things)
    }

    pub fn write(
        format: ThingFormat,
        things: &[Thing],
        into: &dyn WritableResource,
        ctx: &ConversionContext<'_>,
    ) -> Result<()> {
        let syntax = |message: String| ConversionError::syntax(format.label(), into.iri(), message);
        match format {
            ThingFormat::Turtle => into.write_text(&things_to_turtle(things, ctx.namespaces, ctx.list_encoding)?),
            ThingFormat::NTriples => {
                into.write_text(&things_to_ntriples(things, ctx.namespaces, ctx.list_encoding)?)
            }
            ThingFormat::JsonLd => {
                let doc = to_jsonld(things, ctx.namespaces).map_err(RdfError::from)?;
                into.write_text(&serde_json::to_string_pretty(&doc).map_err(|e| syntax(e.to_string()))?)
            }
            ThingFormat::ThingJson => into.write_text(&serde_json::to_string_pretty(things).map_err(|e| syntax(e.to_string()))?),
            ThingFormat::ThingYaml => into.write_text(&serde_yaml::to_string(things).map_err(|e| syntax(e.to_string()))?),
            ThingFormat::ThingCbor => {
                let mut bytes = Vec::new();
                ciborium::ser::into_writer(things, &mut bytes).map_err(|e| syntax(e.to_string()))?;
                into.write_bytes(&bytes)
            }
        }
    }
}

impl ResourceConverter for ThingsResourceConverter {
    fn name(&self) -> &'static str {
        "things"
    }

    fn convert_into(
        &self,
        from: &dyn ReadableResource,
        into: &dyn WritableResource,
        ctx: &ConversionContext<'_>,
    ) -> Result<bool> {
        let (Some(source), Some(target)) = (
            ThingFormat::for_media_type(from.media_type(), ctx),
            ThingFormat::for_media_type(into.media_type(), ctx),
        ) else {
            return Ok(false);
        };
        let things = Self::read(source, from, ctx)?;
        debug!(things = things.len(), from = source.label(), into = target.label(), "converting things");
        Self::write(target, &things, into, ctx)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ResourceConverterChain;
    use crate::resource::{MemoryResource, StringResource};
    use thingraph_media::MediaTypeRegistry;
    use thingraph_model::{DatatypeRepository, NamespaceRepository, Value};
    use thingraph_rdf::ListEncoding;

    struct Env {
        chain: ResourceConverterChain,
        registry: MediaTypeRegistry,
        namespaces: NamespaceRepository,
        datatypes: DatatypeRepository,
    }

    impl Env {
        fn new() -> Self {
            Self {
                chain: ResourceConverterChain::new(vec![Box::new(ThingsResourceConverter)]),
                registry: MediaTypeRegistry::standard().unwrap(),
                namespaces: NamespaceRepository::defaults(),
                datatypes: DatatypeRepository::standard(),
            }
        }

        fn ctx(&self) -> ConversionContext<'_> {
            ConversionContext::new(&self.chain, &self.registry, &self.namespaces, &self.datatypes)
                .with_list_encoding(ListEncoding::Collection)
        }
    }

    fn media_type(s: &str) -> MediaType {
        MediaType::parse(s).unwrap()
    }

    const TURTLE: &str = r#"
        @prefix ex: <https://example.org/> .
        @prefix schema: <https://schema.org/> .
        ex:alice a schema:Person ;
            schema:name "Alice" ;
            schema:age 42 ;
            schema:colors _:c0 .
        _:c0 <http://www.w3.org/1999/02/22-rdf-syntax-ns#first> "red" ;
            <http://www.w3.org/1999/02/22-rdf-syntax-ns#rest> _:c1 .
        _:c1 <http://www.w3.org/1999/02/22-rdf-syntax-ns#first> "green" ;
            <http://www.w3.org/1999/02/22-rdf-syntax-ns#rest> <http://www.w3.org/1999/02/22-rdf-syntax-ns#nil> .
    "#;

    fn alice_from(resource: &dyn ReadableResource, env: &Env) -> Thing {
        let format = ThingFormat::for_media_type(resource.media_type(), &env.ctx()).unwrap();
        let mut things = ThingsResourceConverter::read(format, resource, &env.ctx()).unwrap();
        assert_eq!(things.len(), 1);
        things.remove(0)
    }

    #[test]
    fn test_every_format_preserves_the_things() {
        let env = Env::new();
        let from = StringResource::new("string:alice.ttl", media_type("text/turtle"), TURTLE);
        let expected = alice_from(&from, &env);
        assert_eq!(
            expected.get_list("https://schema.org/colors").unwrap(),
            Some((true, &[Value::string("red"), Value::string("green")][..]))
        );

        for format in ThingFormat::ALL {
            let into = MemoryResource::new("memory:out", media_type(format.essence()));
            env.chain.convert(&from, &into, &env.ctx()).unwrap();
            assert_eq!(alice_from(&into, &env), expected, "{:?}", format);
        }
    }

    #[test]
    fn test_alternative_spelling_is_accepted() {
        let env = Env::new();
        let from = StringResource::new("string:a", media_type("application/x-turtle"), TURTLE);
        let into = MemoryResource::new("memory:out", media_type("application/thing+json"));
        assert!(ThingsResourceConverter.convert_into(&from, &into, &env.ctx()).unwrap());
        let json: serde_json::Value = serde_json::from_slice(&into.bytes()).unwrap();
        assert_eq!(json[0]["identifier"], "https://example.org/alice");
    }

    #[test]
    fn test_single_thing_document() {
        let env = Env::new();
        let from = StringResource::new(
            "string:a",
            media_type(mt::THING_YAML),
            "identifier: https://example.org/a\nproperties:\n  https://schema.org/name: A\n",
        );
        let thing = alice_from(&from, &env);
        assert_eq!(thing.get_string("https://schema.org/name").unwrap(), Some("A"));
    }

    #[test]
    fn test_declines_other_types() {
        let env = Env::new();
        let from = StringResource::new("string:a", media_type("application/json"), "{}");
        let into = MemoryResource::new("memory:out", media_type(mt::TURTLE));
        assert!(!ThingsResourceConverter.convert_into(&from, &into, &env.ctx()).unwrap());
        assert!(into.bytes().is_empty());
    }

    #[test]
    fn test_bad_input_is_an_error() {
        let env = Env::new();
        let from = StringResource::new("string:a", media_type(mt::THING_JSON), "[{\"nope\": 1}]");
        let into = MemoryResource::new("memory:out", media_type(mt::TURTLE));
        let err = ThingsResourceConverter.convert_into(&from, &into, &env.ctx()).unwrap_err();
        assert!(matches!(err, ConversionError::Syntax { format: "Thing JSON", .. }));
    }
}
