//! Property-style XML into Things
//!
//! The document becomes one Thing identified by the resource IRI, holding
//! the root element. Each element becomes a property named by its namespace
//! plus local name (the resource IRI followed by `#` when unqualified):
//! - text-only elements become strings
//! - elements with attributes or children become structs; their own text,
//!   if any, goes under the element's property inside the struct
//! - repeated sibling elements collect into an unordered list
//!
//! The Things are handed back to the chain as Thing JSON, so any writer of
//! the chain can produce the requested target.

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thingraph_media::media_type as mt;
use thingraph_media::MediaType;
use thingraph_model::{Thing, ThingBuilder, Value};
use tracing::trace;

use crate::converter::{ConversionContext, ResourceConverter};
use crate::error::{ConversionError, Result};
use crate::resource::{MemoryResource, ReadableResource, WritableResource};

#[derive(Debug, Default, Clone, Copy)]
pub struct XmlResourceConverter;

impl XmlResourceConverter {
    fn is_xml(media_type: &MediaType, ctx: &ConversionContext<'_>) -> bool {
        ctx.is(media_type, mt::XML) || media_type.structured_suffix() == Some("xml")
    }
}

impl ResourceConverter for XmlResourceConverter {
    fn name(&self) -> &'static str {
        "xml"
    }

    fn convert_into(
        &self,
        from: &dyn ReadableResource,
        into: &dyn WritableResource,
        ctx: &ConversionContext<'_>,
    ) -> Result<bool> {
        if !Self::is_xml(from.media_type(), ctx) || Self::is_xml(into.media_type(), ctx) {
            return Ok(false);
        }
        let thing = xml_to_thing(&from.read_text()?, from.iri())?;
        let json = serde_json::to_vec(&[thing])
            .map_err(|e| ConversionError::syntax("Thing JSON", from.iri(), e.to_string()))?;
        let intermediate = MemoryResource::with_bytes(from.iri(), MediaType::new("text", "thing+json"), json);
        ctx.convert(&intermediate, into)?;
        Ok(true)
    }
}

/// Scope of one open element
struct Open {
    property: String,
    builder: ThingBuilder,
    text: String,
    has_content: bool,
    /// prefix → namespace declared on this element
    namespaces: HashMap<String, String>,
}

/// Read an XML document into a Thing named `iri`
pub fn xml_to_thing(content: &str, iri: &str) -> Result<Thing> {
    let default_namespace = format!("{}#", iri);
    let syntax = |message: String| ConversionError::syntax("XML", iri, message);
    let mut reader = Reader::from_str(content);
    let mut stack: Vec<Open> = Vec::new();
    let mut root = Thing::builder().identifier(iri);

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let open = open_element(e, &stack, &default_namespace).map_err(&syntax)?;
                stack.push(open);
            }
            Ok(Event::Empty(ref e)) => {
                let open = open_element(e, &stack, &default_namespace).map_err(&syntax)?;
                close_element(open, &mut stack, &mut root);
            }
            Ok(Event::Text(ref e)) => {
                let text = e.unescape().map_err(|e| syntax(e.to_string()))?;
                if let Some(open) = stack.last_mut() {
                    open.text.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(open) = stack.last_mut() {
                    open.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::End(_)) => match stack.pop() {
                Some(open) => close_element(open, &mut stack, &mut root),
                None => return Err(syntax("unbalanced end tag".to_string())),
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(syntax(format!("at {}: {}", reader.buffer_position(), e))),
            _ => {}
        }
    }
    if !stack.is_empty() {
        return Err(syntax("unexpected end of document".to_string()));
    }
    Ok(root.build())
}

fn open_element(e: &BytesStart<'_>, stack: &[Open], default_namespace: &str) -> std::result::Result<Open, String> {
    let mut namespaces = HashMap::new();
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr.unescape_value().map_err(|e| e.to_string())?.to_string();
        if key == "xmlns" {
            namespaces.insert(String::new(), value);
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            namespaces.insert(prefix.to_string(), value);
        } else {
            attributes.push((key, value));
        }
    }

    let resolve = |qname: &str, is_attribute: bool| -> std::result::Result<String, String> {
        let (prefix, local) = match qname.split_once(':') {
            Some((prefix, local)) => (prefix, local),
            None => ("", qname),
        };
        // unprefixed attributes are not in the default namespace
        let namespace = if prefix.is_empty() && is_attribute {
            None
        } else {
            namespaces
                .get(prefix)
                .or_else(|| stack.iter().rev().find_map(|open| open.namespaces.get(prefix)))
        };
        match namespace {
            Some(ns) => Ok(join(ns, local)),
            None if prefix.is_empty() || prefix == "xml" => Ok(join(default_namespace, local)),
            None => Err(format!("undeclared namespace prefix '{}'", prefix)),
        }
    };

    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
    let property = resolve(&name, false)?;
    let mut builder = Thing::builder();
    let has_content = !attributes.is_empty();
    for (key, value) in attributes {
        builder.put(resolve(&key, true)?, value);
    }
    trace!(property = %property, "open element");
    Ok(Open {
        property,
        builder,
        text: String::new(),
        has_content,
        namespaces,
    })
}

fn close_element(open: Open, stack: &mut [Open], root: &mut ThingBuilder) {
    let text = open.text.trim();
    let value = if open.has_content {
        let mut builder = open.builder;
        if !text.is_empty() {
            builder.put(open.property.clone(), text);
        }
        Some(Value::structure(builder.build()))
    } else if !text.is_empty() {
        Some(Value::string(text))
    } else {
        None
    };
    let Some(value) = value else {
        return;
    };
    match stack.last_mut() {
        Some(parent) => {
            parent.has_content = true;
            add(&mut parent.builder, open.property, value);
        }
        None => add(root, open.property, value),
    }
}

/// Set, promoting to an unordered list on repetition
fn add(builder: &mut ThingBuilder, property: String, value: Value) {
    let merged = match builder.remove(&property) {
        None => value,
        Some(Value::List { ordered: false, mut values }) => {
            values.push(value);
            Value::unordered(values)
        }
        Some(existing) => Value::unordered(vec![existing, value]),
    };
    builder.put(property, merged);
}

fn join(namespace: &str, local: &str) -> String {
    if namespace.ends_with(['/', '#']) {
        format!("{}{}", namespace, local)
    } else {
        format!("{}/{}", namespace, local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IRI: &str = "https://example.org/greeting.xml";

    #[test]
    fn test_text_elements_become_strings() {
        let thing = xml_to_thing("<greeting><message>hello</message></greeting>", IRI).unwrap();
        assert_eq!(thing.identifier(), Some(IRI));
        let greeting = thing.get_struct(&format!("{}#greeting", IRI)).unwrap().unwrap();
        assert_eq!(greeting.get_string(&format!("{}#message", IRI)).unwrap(), Some("hello"));
    }

    #[test]
    fn test_attributes_and_namespaces() {
        let xml = r#"<?xml version="1.0"?>
            <g:greeting xmlns:g="https://example.org/ns/" lang="en">
                <g:message>hello &amp; welcome</g:message>
            </g:greeting>"#;
        let thing = xml_to_thing(xml, IRI).unwrap();
        let greeting = thing.get_struct("https://example.org/ns/greeting").unwrap().unwrap();
        assert_eq!(greeting.get_string(&format!("{}#lang", IRI)).unwrap(), Some("en"));
        assert_eq!(
            greeting.get_string("https://example.org/ns/message").unwrap(),
            Some("hello & welcome")
        );
    }

    #[test]
    fn test_repeated_elements_become_list() {
        let xml = "<list><item>a</item><item>b</item><item>c</item></list>";
        let thing = xml_to_thing(xml, IRI).unwrap();
        let list = thing.get_struct(&format!("{}#list", IRI)).unwrap().unwrap();
        let (ordered, values) = list.get_list(&format!("{}#item", IRI)).unwrap().unwrap();
        assert!(!ordered);
        assert_eq!(values, &[Value::string("a"), Value::string("b"), Value::string("c")]);
    }

    #[test]
    fn test_empty_elements_are_dropped() {
        let thing = xml_to_thing("<root><empty/><also></also></root>", IRI).unwrap();
        assert!(thing.is_empty());
    }

    #[test]
    fn test_malformed() {
        assert!(xml_to_thing("<a><b></a>", IRI).is_err());
        assert!(xml_to_thing("<a>", IRI).is_err());
        assert!(xml_to_thing("<x:a/>", IRI).is_err());
    }
}
