//! Thing: the central graph node
//!
//! A Thing is an optional identifier plus a map from predicate IRI to
//! [`Value`]. Things are immutable once built; an update is modeled as a new
//! Thing built from the old one via [`Thing::to_builder`].

use crate::datatype::{DatatypeRepository, TypedValue};
use crate::error::{Result, ThingError};
use crate::value::{Value, ValueKind};
use std::collections::BTreeMap;

/// An immutable graph node
///
/// # Example
///
/// ```
/// use thingraph_model::{Thing, Value};
///
/// let alice = Thing::builder()
///     .identifier("https://example.org/alice")
///     .set_string("https://schema.org/name", "Alice")
///     .set_link("https://schema.org/knows", "https://example.org/bob")
///     .build();
///
/// assert_eq!(alice.get_string("https://schema.org/name").unwrap(), Some("Alice"));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Thing {
    identifier: Option<String>,
    properties: BTreeMap<String, Value>,
}

impl Thing {
    pub fn builder() -> ThingBuilder {
        ThingBuilder::default()
    }

    /// Builder pre-populated with this Thing's identifier and properties
    pub fn to_builder(&self) -> ThingBuilder {
        ThingBuilder {
            identifier: self.identifier.clone(),
            properties: self.properties.clone(),
        }
    }

    /// Identifier, absent for anonymous (struct) Things
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    pub fn properties(&self) -> &BTreeMap<String, Value> {
        &self.properties
    }

    pub fn predicates(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Raw value stored for a predicate
    pub fn get(&self, predicate: &str) -> Option<&Value> {
        self.properties.get(predicate)
    }

    /// Whether the value for `predicate` is a list
    pub fn is_iterable(&self, predicate: &str) -> bool {
        self.get(predicate).is_some_and(Value::is_iterable)
    }

    pub fn get_string(&self, predicate: &str) -> Result<Option<&str>> {
        self.typed(predicate, ValueKind::PlainString, Value::as_str)
    }

    pub fn get_link(&self, predicate: &str) -> Result<Option<&str>> {
        self.typed(predicate, ValueKind::Link, Value::as_link)
    }

    /// `(lexical text, datatype IRI)` of a literal
    pub fn get_literal(&self, predicate: &str) -> Result<Option<(&str, &str)>> {
        self.typed(predicate, ValueKind::Literal, Value::as_literal)
    }

    pub fn get_struct(&self, predicate: &str) -> Result<Option<&Thing>> {
        self.typed(predicate, ValueKind::Struct, Value::as_struct)
    }

    /// `(ordered, values)` of a list
    pub fn get_list(&self, predicate: &str) -> Result<Option<(bool, &[Value])>> {
        self.typed(predicate, ValueKind::List, Value::as_list)
    }

    /// Parse a scalar value into a typed value using its datatype.
    ///
    /// Plain strings and links convert without a lookup; literals need their
    /// datatype registered in `datatypes`.
    pub fn get_typed(
        &self,
        predicate: &str,
        datatypes: &DatatypeRepository,
    ) -> Result<Option<TypedValue>> {
        let Some(value) = self.get(predicate) else {
            return Ok(None);
        };
        match value {
            Value::PlainString(s) => Ok(Some(TypedValue::String(s.clone()))),
            Value::Link { iri, .. } => Ok(Some(TypedValue::Iri(iri.clone()))),
            Value::Literal {
                value: text,
                datatype,
            } => {
                let dt = datatypes
                    .get(datatype)
                    .ok_or_else(|| ThingError::UnknownDatatype {
                        predicate: predicate.to_string(),
                        datatype: datatype.clone(),
                    })?;
                Ok(Some(dt.parse(text)?))
            }
            other => Err(ThingError::TypeMismatch {
                predicate: predicate.to_string(),
                expected: ValueKind::Literal,
                actual: other.kind(),
            }),
        }
    }

    /// Visit the predicate IRIs and every IRI mentioned by the values.
    ///
    /// The identifier is not visited: for nested Things it is a blank label.
    pub fn visit_iris<'a>(&'a self, visit: &mut dyn FnMut(&'a str)) {
        for (predicate, value) in &self.properties {
            visit(predicate);
            value.visit_iris(visit);
        }
    }

    fn typed<'a, T>(
        &'a self,
        predicate: &str,
        expected: ValueKind,
        project: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Result<Option<T>> {
        match self.get(predicate) {
            None => Ok(None),
            Some(value) => {
                let actual = value.kind();
                project(value).map(Some).ok_or(ThingError::TypeMismatch {
                    predicate: predicate.to_string(),
                    expected,
                    actual,
                })
            }
        }
    }
}

/// Mutable accumulator that freezes into a [`Thing`]
#[derive(Clone, Debug, Default)]
pub struct ThingBuilder {
    identifier: Option<String>,
    properties: BTreeMap<String, Value>,
}

impl ThingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identifier(mut self, iri: impl Into<String>) -> Self {
        self.identifier = Some(iri.into());
        self
    }

    pub fn set_identifier(&mut self, iri: impl Into<String>) -> &mut Self {
        self.identifier = Some(iri.into());
        self
    }

    /// Set (replace) the value of a predicate
    pub fn set(mut self, predicate: impl Into<String>, value: impl Into<Value>) -> Self {
        self.put(predicate, value);
        self
    }

    /// Set a typed literal
    pub fn set_literal(
        self,
        predicate: impl Into<String>,
        text: impl Into<String>,
        datatype: impl Into<String>,
    ) -> Self {
        self.set(predicate, Value::literal(text, datatype))
    }

    pub fn set_string(self, predicate: impl Into<String>, text: impl Into<String>) -> Self {
        self.set(predicate, Value::string(text))
    }

    pub fn set_link(self, predicate: impl Into<String>, iri: impl Into<String>) -> Self {
        self.set(predicate, Value::link(iri))
    }

    /// In-place variant of [`ThingBuilder::set`]
    pub fn put(&mut self, predicate: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.properties.insert(predicate.into(), value.into());
        self
    }

    pub fn remove(&mut self, predicate: &str) -> Option<Value> {
        self.properties.remove(predicate)
    }

    pub fn get(&self, predicate: &str) -> Option<&Value> {
        self.properties.get(predicate)
    }

    pub fn build(self) -> Thing {
        Thing {
            identifier: self.identifier,
            properties: self.properties,
        }
    }
}
