//! JSON-LD documents ⇄ Things
//!
//! Writing produces `{"@context": {...}, "@graph": [...]}` with the used
//! prefixes only, compact IRIs, `rdf:type` as `@type`, structs as embedded
//! node objects and ordered lists as `@list`.
//!
//! Reading accepts that shape and expanded documents. Contexts may bind
//! prefixes, plain term aliases (`"name": "https://schema.org/name"` or
//! `{"@id": ...}`) and `@vocab`; remote contexts are rejected.

use std::collections::HashMap;

use serde_json::{json, Map, Value as JsonValue};
use thingraph_model::{NamespaceRepository, Thing, ThingBuilder, Value};
use thingraph_vocab::{rdf, xsd};
use tracing::trace;

use crate::error::JsonLdError;
use crate::export::ThingExporter;

/// Render `things` as a JSON-LD document
pub fn to_jsonld(things: &[Thing], namespaces: &NamespaceRepository) -> Result<JsonValue, JsonLdError> {
    if let Some(index) = things.iter().position(|t| t.identifier().is_none()) {
        return Err(crate::error::ExportError::MissingIdentifier { index }.into());
    }
    let used = ThingExporter::new(namespaces).used_namespaces(things);
    let context: Map<String, JsonValue> = used
        .iter()
        .map(|ns| (ns.prefix.clone(), JsonValue::String(ns.iri.clone())))
        .collect();
    let compactor = Compactor { namespaces };
    let graph: Vec<JsonValue> = things.iter().map(|t| compactor.node(t)).collect();
    Ok(json!({ "@context": context, "@graph": graph }))
}

struct Compactor<'a> {
    namespaces: &'a NamespaceRepository,
}

impl Compactor<'_> {
    fn iri(&self, iri: &str) -> String {
        self.namespaces.compact(iri).unwrap_or_else(|| iri.to_string())
    }

    fn node(&self, thing: &Thing) -> JsonValue {
        let mut node = Map::new();
        if let Some(id) = thing.identifier() {
            node.insert("@id".to_string(), JsonValue::String(self.iri(id)));
        }
        for (predicate, value) in thing.properties() {
            if predicate == rdf::TYPE {
                if let Some(types) = self.types(value) {
                    node.insert("@type".to_string(), types);
                    continue;
                }
            }
            node.insert(self.iri(predicate), self.value(value));
        }
        JsonValue::Object(node)
    }

    /// `@type` form of an rdf:type value, when it consists of links only
    fn types(&self, value: &Value) -> Option<JsonValue> {
        match value {
            Value::Link { iri, .. } => Some(JsonValue::String(self.iri(iri))),
            Value::List { ordered: false, values } => values
                .iter()
                .map(|v| v.as_link().map(|iri| JsonValue::String(self.iri(iri))))
                .collect::<Option<Vec<_>>>()
                .map(JsonValue::Array),
            _ => None,
        }
    }

    fn value(&self, value: &Value) -> JsonValue {
        match value {
            Value::PlainString(s) => JsonValue::String(s.clone()),
            Value::Link { iri, .. } => json!({ "@id": self.iri(iri) }),
            Value::Literal { value, datatype } => {
                json!({ "@value": value, "@type": self.iri(datatype) })
            }
            Value::Struct(thing) => self.node(thing),
            Value::List { ordered: true, values } => {
                json!({ "@list": values.iter().map(|v| self.value(v)).collect::<Vec<_>>() })
            }
            Value::List { ordered: false, values } => {
                JsonValue::Array(values.iter().map(|v| self.value(v)).collect())
            }
        }
    }
}

/// Read the Things of a JSON-LD document
pub fn from_jsonld(document: &JsonValue) -> Result<Vec<Thing>, JsonLdError> {
    let (context, nodes) = match document {
        JsonValue::Array(nodes) => (Context::default(), nodes.iter().collect::<Vec<_>>()),
        JsonValue::Object(map) => {
            let context = match map.get("@context") {
                Some(ctx) => Context::parse(ctx)?,
                None => Context::default(),
            };
            match map.get("@graph") {
                Some(JsonValue::Array(nodes)) => (context, nodes.iter().collect()),
                Some(other) => {
                    return Err(JsonLdError::Invalid(format!("@graph must be an array, got {}", other)))
                }
                None => (context, vec![document]),
            }
        }
        other => return Err(JsonLdError::Invalid(format!("expected object or array, got {}", other))),
    };

    let things = nodes
        .into_iter()
        .map(|node| context.node(node))
        .collect::<Result<Vec<_>, _>>()?;
    trace!(things = things.len(), "read JSON-LD document");
    Ok(things)
}

#[derive(Debug, Default)]
struct Context {
    terms: HashMap<String, String>,
    vocab: Option<String>,
}

impl Context {
    fn parse(ctx: &JsonValue) -> Result<Self, JsonLdError> {
        let mut context = Context::default();
        let entries: Vec<&JsonValue> = match ctx {
            JsonValue::Array(items) => items.iter().collect(),
            single => vec![single],
        };
        for entry in entries {
            let map = match entry {
                JsonValue::Object(map) => map,
                JsonValue::String(url) => {
                    return Err(JsonLdError::Unsupported(format!("remote context {}", url)))
                }
                JsonValue::Null => continue,
                other => return Err(JsonLdError::Invalid(format!("bad @context entry {}", other))),
            };
            for (key, value) in map {
                let target = match value {
                    JsonValue::String(iri) => iri.clone(),
                    JsonValue::Object(def) => match def.get("@id").and_then(JsonValue::as_str) {
                        Some(iri) => iri.to_string(),
                        None => continue,
                    },
                    _ => continue,
                };
                if key == "@vocab" {
                    context.vocab = Some(target);
                } else if !key.starts_with('@') {
                    context.terms.insert(key.clone(), target);
                }
            }
        }
        // term definitions may themselves use prefixes
        let expanded: HashMap<String, String> = context
            .terms
            .iter()
            .map(|(k, v)| (k.clone(), context.expand_id(v)))
            .collect();
        context.terms = expanded;
        Ok(context)
    }

    /// Expand a node identifier or IRI value (no `@vocab`)
    fn expand_id(&self, value: &str) -> String {
        if let Some((prefix, local)) = value.split_once(':') {
            if !local.starts_with("//") {
                if let Some(ns) = self.terms.get(prefix) {
                    return format!("{}{}", ns, local);
                }
            }
        }
        value.to_string()
    }

    /// Expand a property or type name
    fn expand_vocab(&self, value: &str) -> String {
        if let Some(iri) = self.terms.get(value) {
            return iri.clone();
        }
        if !value.contains(':') {
            if let Some(vocab) = &self.vocab {
                return format!("{}{}", vocab, value);
            }
        }
        self.expand_id(value)
    }

    fn node(&self, node: &JsonValue) -> Result<Thing, JsonLdError> {
        let map = node
            .as_object()
            .ok_or_else(|| JsonLdError::Invalid(format!("expected node object, got {}", node)))?;
        let mut builder = Thing::builder();
        if let Some(id) = map.get("@id") {
            let id = id
                .as_str()
                .ok_or_else(|| JsonLdError::Invalid("@id must be a string".to_string()))?;
            builder.set_identifier(self.expand_id(id));
        }
        for (key, value) in map {
            match key.as_str() {
                "@id" | "@context" => {}
                "@type" => self.types(&mut builder, value)?,
                k if k.starts_with('@') => trace!(keyword = k, "ignoring JSON-LD keyword"),
                k => {
                    if let Some(value) = self.value(value)? {
                        builder.put(self.expand_vocab(k), value);
                    }
                }
            }
        }
        Ok(builder.build())
    }

    fn types(&self, builder: &mut ThingBuilder, value: &JsonValue) -> Result<(), JsonLdError> {
        let names: Vec<&str> = match value {
            JsonValue::String(s) => vec![s.as_str()],
            JsonValue::Array(items) => items
                .iter()
                .map(|v| v.as_str().ok_or_else(|| JsonLdError::Invalid("@type entries must be strings".into())))
                .collect::<Result<_, _>>()?,
            other => return Err(JsonLdError::Invalid(format!("bad @type {}", other))),
        };
        let mut links: Vec<Value> = names.into_iter().map(|n| Value::link(self.expand_vocab(n))).collect();
        match links.len() {
            0 => {}
            1 => {
                builder.put(rdf::TYPE, links.remove(0));
            }
            _ => {
                builder.put(rdf::TYPE, Value::unordered(links));
            }
        }
        Ok(())
    }

    fn value(&self, value: &JsonValue) -> Result<Option<Value>, JsonLdError> {
        Ok(Some(match value {
            JsonValue::Null => return Ok(None),
            JsonValue::String(s) => Value::string(s.as_str()),
            JsonValue::Bool(b) => Value::literal(b.to_string(), xsd::BOOLEAN),
            JsonValue::Number(n) => number_literal(n),
            JsonValue::Array(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.extend(self.value(item)?);
                }
                match values.len() {
                    0 => return Ok(None),
                    1 => values.remove(0),
                    _ => Value::unordered(values),
                }
            }
            JsonValue::Object(map) => return self.object_value(map).map(Some),
        }))
    }

    fn object_value(&self, map: &Map<String, JsonValue>) -> Result<Value, JsonLdError> {
        if let Some(list) = map.get("@list") {
            let items = list
                .as_array()
                .ok_or_else(|| JsonLdError::Invalid("@list must be an array".to_string()))?;
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.extend(self.value(item)?);
            }
            return Ok(Value::ordered(values));
        }
        if let Some(raw) = map.get("@value") {
            if map.contains_key("@language") {
                return Err(JsonLdError::Unsupported("language-tagged values".to_string()));
            }
            let datatype = map.get("@type").and_then(JsonValue::as_str);
            return Ok(match (raw, datatype) {
                (JsonValue::String(s), None) => Value::string(s.as_str()),
                (JsonValue::String(s), Some(dt)) => Value::literal(s.as_str(), self.expand_vocab(dt)),
                (JsonValue::Bool(b), dt) => Value::literal(b.to_string(), dt.map_or(xsd::BOOLEAN.to_string(), |d| self.expand_vocab(d))),
                (JsonValue::Number(n), None) => number_literal(n),
                (JsonValue::Number(n), Some(dt)) => Value::literal(n.to_string(), self.expand_vocab(dt)),
                (other, _) => return Err(JsonLdError::Invalid(format!("bad @value {}", other))),
            });
        }
        let only_id = map.keys().all(|k| k == "@id");
        match map.get("@id").and_then(JsonValue::as_str) {
            Some(id) if only_id => Ok(Value::link(self.expand_id(id))),
            _ => self.node(&JsonValue::Object(map.clone())).map(Value::structure),
        }
    }
}

fn number_literal(n: &serde_json::Number) -> Value {
    if n.is_i64() || n.is_u64() {
        Value::literal(n.to_string(), xsd::INTEGER)
    } else {
        Value::literal(n.to_string(), xsd::DOUBLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Thing {
        let address = Thing::builder()
            .set_string("https://schema.org/city", "Lyon")
            .build();
        Thing::builder()
            .identifier("https://example.org/alice")
            .set_link(rdf::TYPE, "https://schema.org/Person")
            .set_string("https://schema.org/name", "Alice")
            .set_literal("https://schema.org/age", "42", xsd::INTEGER)
            .set("https://schema.org/address", address)
            .set(
                "https://schema.org/colors",
                Value::ordered(vec!["red".into(), "green".into()]),
            )
            .build()
    }

    #[test]
    fn test_to_jsonld_shape() {
        let doc = to_jsonld(&[sample()], &NamespaceRepository::defaults()).unwrap();
        assert_eq!(
            doc,
            json!({
                "@context": {
                    "ex": "https://example.org/",
                    "rdf": "http://www.w3.org/1999/02/22-rdf-syntax-ns#",
                    "schema": "https://schema.org/",
                    "xsd": "http://www.w3.org/2001/XMLSchema#",
                },
                "@graph": [{
                    "@id": "ex:alice",
                    "@type": "schema:Person",
                    "schema:address": { "schema:city": "Lyon" },
                    "schema:age": { "@value": "42", "@type": "xsd:integer" },
                    "schema:colors": { "@list": ["red", "green"] },
                    "schema:name": "Alice",
                }]
            })
        );
    }

    #[test]
    fn test_round_trip() {
        let namespaces = NamespaceRepository::defaults();
        let doc = to_jsonld(&[sample()], &namespaces).unwrap();
        let back = from_jsonld(&doc).unwrap();
        assert_eq!(back, vec![sample()]);
    }

    #[test]
    fn test_vocab_and_native_values() {
        let doc = json!({
            "@context": { "@vocab": "https://schema.org/", "ex": "https://example.org/" },
            "@id": "ex:bob",
            "name": "Bob",
            "age": 30,
            "member": true,
            "knows": [{ "@id": "ex:alice" }, { "@id": "ex:carol" }],
        });
        let things = from_jsonld(&doc).unwrap();
        let bob = &things[0];
        assert_eq!(bob.identifier(), Some("https://example.org/bob"));
        assert_eq!(bob.get_string("https://schema.org/name").unwrap(), Some("Bob"));
        assert_eq!(
            bob.get_literal("https://schema.org/age").unwrap(),
            Some(("30", xsd::INTEGER))
        );
        assert_eq!(
            bob.get_literal("https://schema.org/member").unwrap(),
            Some(("true", xsd::BOOLEAN))
        );
        let (ordered, knows) = bob.get_list("https://schema.org/knows").unwrap().unwrap();
        assert!(!ordered);
        assert_eq!(knows[1], Value::link("https://example.org/carol"));
    }

    #[test]
    fn test_remote_context_is_unsupported() {
        let err = from_jsonld(&json!({ "@context": "https://schema.org/", "name": "x" })).unwrap_err();
        assert!(matches!(err, JsonLdError::Unsupported(_)));
    }

    #[test]
    fn test_language_values_are_unsupported() {
        let doc = json!({ "@id": "https://example.org/a", "https://schema.org/name": { "@value": "Hallo", "@language": "de" } });
        assert!(matches!(from_jsonld(&doc), Err(JsonLdError::Unsupported(_))));
    }
}
