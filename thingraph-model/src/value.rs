//! Property values of a Thing
//!
//! A value is one of a closed set of kinds:
//! - a plain (untyped) string
//! - a link to another Thing, by identifier
//! - a typed literal: lexical text plus a datatype IRI
//! - a struct: a nested Thing without an identifier of its own
//! - a list, either ordered or unordered
//!
//! Lists may mix kinds; consumers must not assume homogeneity.

use crate::Thing;
use std::fmt;

/// Discriminant of [`Value`], used in error messages
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKind {
    PlainString,
    Link,
    Literal,
    Struct,
    List,
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::PlainString => "string",
            ValueKind::Link => "link",
            ValueKind::Literal => "literal",
            ValueKind::Struct => "struct",
            ValueKind::List => "list",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A property value
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Untyped text
    PlainString(String),

    /// Reference to another Thing, optionally with a display label
    Link { iri: String, label: Option<String> },

    /// Lexical text plus datatype IRI
    Literal { value: String, datatype: String },

    /// Nested Thing (the in-graph equivalent of a blank node)
    Struct(Box<Thing>),

    /// Sequence of values; `ordered` decides how it is re-serialized
    List { ordered: bool, values: Vec<Value> },
}

impl Value {
    pub fn string(text: impl Into<String>) -> Self {
        Value::PlainString(text.into())
    }

    pub fn link(iri: impl Into<String>) -> Self {
        Value::Link {
            iri: iri.into(),
            label: None,
        }
    }

    pub fn labelled_link(iri: impl Into<String>, label: impl Into<String>) -> Self {
        Value::Link {
            iri: iri.into(),
            label: Some(label.into()),
        }
    }

    pub fn literal(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Value::Literal {
            value: value.into(),
            datatype: datatype.into(),
        }
    }

    pub fn structure(thing: Thing) -> Self {
        Value::Struct(Box::new(thing))
    }

    pub fn ordered(values: Vec<Value>) -> Self {
        Value::List {
            ordered: true,
            values,
        }
    }

    pub fn unordered(values: Vec<Value>) -> Self {
        Value::List {
            ordered: false,
            values,
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::PlainString(_) => ValueKind::PlainString,
            Value::Link { .. } => ValueKind::Link,
            Value::Literal { .. } => ValueKind::Literal,
            Value::Struct(_) => ValueKind::Struct,
            Value::List { .. } => ValueKind::List,
        }
    }

    /// True for lists, the only kind that holds several values
    pub fn is_iterable(&self) -> bool {
        matches!(self, Value::List { .. })
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::PlainString(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_link(&self) -> Option<&str> {
        match self {
            Value::Link { iri, .. } => Some(iri),
            _ => None,
        }
    }

    /// `(lexical text, datatype IRI)` of a literal
    pub fn as_literal(&self) -> Option<(&str, &str)> {
        match self {
            Value::Literal { value, datatype } => Some((value, datatype)),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&Thing> {
        match self {
            Value::Struct(thing) => Some(thing),
            _ => None,
        }
    }

    /// `(ordered, values)` of a list
    pub fn as_list(&self) -> Option<(bool, &[Value])> {
        match self {
            Value::List { ordered, values } => Some((*ordered, values)),
            _ => None,
        }
    }

    /// Visit every IRI this value mentions: link targets, literal datatypes,
    /// and recursively everything inside structs and lists.
    pub fn visit_iris<'a>(&'a self, visit: &mut dyn FnMut(&'a str)) {
        match self {
            Value::PlainString(_) => {}
            Value::Link { iri, .. } => visit(iri),
            Value::Literal { datatype, .. } => visit(datatype),
            Value::Struct(thing) => thing.visit_iris(visit),
            Value::List { values, .. } => {
                for value in values {
                    value.visit_iris(visit);
                }
            }
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::PlainString(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::PlainString(text)
    }
}

impl From<Thing> for Value {
    fn from(thing: Thing) -> Self {
        Value::structure(thing)
    }
}
