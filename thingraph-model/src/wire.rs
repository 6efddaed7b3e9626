//! Wire shape of Things and Values
//!
//! ```text
//! Thing = { "identifier"?: string, "properties": { <predicate>: Value } }
//! Value = string
//!       | { "link": iri, "label"?: string }
//!       | { "literal": { "value": string, "datatype": iri } }
//!       | { "struct": Thing }
//!       | { "list": { "ordered": bool, "values": [Value] } }
//! ```
//!
//! The same shape backs the Thing JSON, YAML and CBOR formats.

use crate::{Thing, Value};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

#[derive(Serialize)]
struct ThingOut<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    identifier: Option<&'a str>,
    properties: &'a BTreeMap<String, Value>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ThingIn {
    #[serde(default)]
    identifier: Option<String>,
    #[serde(default)]
    properties: BTreeMap<String, Value>,
}

#[derive(Serialize, Deserialize)]
struct LiteralWire<S> {
    value: S,
    datatype: S,
}

#[derive(Serialize)]
struct ListOut<'a> {
    ordered: bool,
    values: &'a [Value],
}

#[derive(Deserialize)]
struct ListIn {
    #[serde(default)]
    ordered: bool,
    values: Vec<Value>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum ValueOut<'a> {
    String(&'a str),
    Link {
        link: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        label: Option<&'a str>,
    },
    Literal {
        literal: LiteralWire<&'a str>,
    },
    Struct {
        #[serde(rename = "struct")]
        thing: &'a Thing,
    },
    List {
        list: ListOut<'a>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ValueIn {
    String(String),
    Link {
        link: String,
        #[serde(default)]
        label: Option<String>,
    },
    Literal {
        literal: LiteralWire<String>,
    },
    Struct {
        #[serde(rename = "struct")]
        thing: Thing,
    },
    List {
        list: ListIn,
    },
}

impl Serialize for Thing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ThingOut {
            identifier: self.identifier(),
            properties: self.properties(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Thing {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = ThingIn::deserialize(deserializer)?;
        let mut builder = Thing::builder();
        if let Some(identifier) = wire.identifier {
            builder.set_identifier(identifier);
        }
        for (predicate, value) in wire.properties {
            builder.put(predicate, value);
        }
        Ok(builder.build())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let wire = match self {
            Value::PlainString(s) => ValueOut::String(s),
            Value::Link { iri, label } => ValueOut::Link {
                link: iri,
                label: label.as_deref(),
            },
            Value::Literal { value, datatype } => ValueOut::Literal {
                literal: LiteralWire {
                    value: value.as_str(),
                    datatype: datatype.as_str(),
                },
            },
            Value::Struct(thing) => ValueOut::Struct { thing },
            Value::List { ordered, values } => ValueOut::List {
                list: ListOut {
                    ordered: *ordered,
                    values,
                },
            },
        };
        wire.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match ValueIn::deserialize(deserializer)? {
            ValueIn::String(s) => Value::PlainString(s),
            ValueIn::Link { link, label } => Value::Link { iri: link, label },
            ValueIn::Literal { literal } => Value::Literal {
                value: literal.value,
                datatype: literal.datatype,
            },
            ValueIn::Struct { thing } => Value::Struct(Box::new(thing)),
            ValueIn::List { list } => Value::List {
                ordered: list.ordered,
                values: list.values,
            },
        })
    }
}
