//! Things → statements
//!
//! For each top-level Thing the exporter emits all of its own statements
//! first, then the statements of the blank nodes it introduced (nested
//! structs, collection cells), breadth-first. Prefix declarations are limited
//! to the namespaces that match at least one IRI actually used.
//!
//! # Lists
//!
//! With [`ListEncoding::Repeated`], the default, every list element becomes
//! its own statement. Importing those statements back yields an *unordered*
//! list (or a scalar for a one-element list): ordering does not survive this
//! encoding. [`ListEncoding::Collection`] writes ordered lists as
//! `rdf:first`/`rdf:rest` chains instead, which the importer turns back into
//! ordered lists.

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::str::FromStr;

use thingraph_graph_ir::{BlankId, Graph, GraphCollectorSink, GraphSink, Term};
use thingraph_model::{Namespace, NamespaceRepository, Thing, Value};
use thingraph_vocab::rdf;
use tracing::debug;

use crate::error::ExportError;

/// How list values are written as statements
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListEncoding {
    /// One statement per element, for ordered and unordered lists alike
    #[default]
    Repeated,
    /// Ordered lists as first/rest chains, unordered lists repeated
    Collection,
}

impl FromStr for ListEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "repeated" => Ok(ListEncoding::Repeated),
            "collection" => Ok(ListEncoding::Collection),
            other => Err(format!("unknown list encoding {:?}", other)),
        }
    }
}

/// Walks Things and emits their statements to a [`GraphSink`]
#[derive(Debug, Clone, Copy)]
pub struct ThingExporter<'a> {
    namespaces: &'a NamespaceRepository,
    list_encoding: ListEncoding,
}

enum Nested<'t> {
    Struct(BlankId, &'t Thing),
    Cell {
        label: BlankId,
        value: &'t Value,
        next: Option<BlankId>,
    },
}

#[derive(Default)]
struct BlankLabels {
    used: HashSet<String>,
    counter: usize,
}

impl BlankLabels {
    fn fresh(&mut self) -> BlankId {
        loop {
            let label = format!("b{}", self.counter);
            self.counter += 1;
            if self.used.insert(label.clone()) {
                return BlankId::new(label);
            }
        }
    }

    /// The Thing's own identifier when usable as a label, else a fresh one
    fn for_thing(&mut self, thing: &Thing) -> BlankId {
        match thing.identifier() {
            Some(id) if is_label(id) && self.used.insert(id.to_string()) => BlankId::new(id),
            _ => self.fresh(),
        }
    }
}

fn is_label(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

impl<'a> ThingExporter<'a> {
    pub fn new(namespaces: &'a NamespaceRepository) -> Self {
        Self {
            namespaces,
            list_encoding: ListEncoding::default(),
        }
    }

    pub fn with_list_encoding(mut self, list_encoding: ListEncoding) -> Self {
        self.list_encoding = list_encoding;
        self
    }

    /// Export into a fresh [`Graph`]
    pub fn to_graph(&self, things: &[Thing]) -> Result<Graph, ExportError> {
        let mut sink = GraphCollectorSink::new();
        self.export(things, &mut sink)?;
        Ok(sink.finish())
    }

    /// Emit `things` to `sink`; nothing is emitted if one lacks an identifier
    pub fn export<S: GraphSink + ?Sized>(&self, things: &[Thing], sink: &mut S) -> Result<(), ExportError> {
        if let Some(index) = things.iter().position(|t| t.identifier().is_none()) {
            return Err(ExportError::MissingIdentifier { index });
        }

        sink.start_graph();
        let namespaces = self.used_namespaces(things);
        for ns in &namespaces {
            sink.on_prefix(&ns.prefix, &ns.iri);
        }

        let mut labels = BlankLabels::default();
        let mut queue = VecDeque::new();
        for thing in things {
            let subject = Term::iri(thing.identifier().unwrap_or_default());
            self.emit_subject(&subject, thing, sink, &mut labels, &mut queue);
            while let Some(nested) = queue.pop_front() {
                match nested {
                    Nested::Struct(label, nested_thing) => {
                        let subject = Term::BlankNode(label);
                        self.emit_subject(&subject, nested_thing, sink, &mut labels, &mut queue);
                    }
                    Nested::Cell { label, value, next } => {
                        let subject = Term::BlankNode(label);
                        let first = self.object_term(value, &mut labels, &mut queue);
                        sink.emit_triple(subject.clone(), Term::iri(rdf::FIRST), first);
                        let rest = next.map_or_else(|| Term::iri(rdf::NIL), Term::BlankNode);
                        sink.emit_triple(subject, Term::iri(rdf::REST), rest);
                    }
                }
            }
        }
        sink.end_graph();
        debug!(
            things = things.len(),
            prefixes = namespaces.len(),
            blank_nodes = labels.used.len(),
            "exported things"
        );
        Ok(())
    }

    /// Namespaces matching at least one IRI used by `things`, in prefix order
    pub fn used_namespaces(&self, things: &[Thing]) -> Vec<Namespace> {
        let mut iris: Vec<&str> = Vec::new();
        for thing in things {
            iris.extend(thing.identifier());
            thing.visit_iris(&mut |iri| iris.push(iri));
        }
        if self.list_encoding == ListEncoding::Collection
            && things
                .iter()
                .flat_map(|t| t.properties().values())
                .any(has_ordered_list)
        {
            iris.extend([rdf::FIRST, rdf::REST, rdf::NIL]);
        }

        iris.into_iter()
            .filter_map(|iri| self.namespaces.longest_match(iri))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn emit_subject<'t, S: GraphSink + ?Sized>(
        &self,
        subject: &Term,
        thing: &'t Thing,
        sink: &mut S,
        labels: &mut BlankLabels,
        queue: &mut VecDeque<Nested<'t>>,
    ) {
        for (predicate, value) in thing.properties() {
            self.emit_value(subject, predicate, value, sink, labels, queue);
        }
    }

    fn emit_value<'t, S: GraphSink + ?Sized>(
        &self,
        subject: &Term,
        predicate: &str,
        value: &'t Value,
        sink: &mut S,
        labels: &mut BlankLabels,
        queue: &mut VecDeque<Nested<'t>>,
    ) {
        match value {
            Value::List { ordered, values }
                if !(*ordered && self.list_encoding == ListEncoding::Collection) =>
            {
                for element in values {
                    self.emit_value(subject, predicate, element, sink, labels, queue);
                }
            }
            other => {
                let object = self.object_term(other, labels, queue);
                sink.emit_triple(subject.clone(), Term::iri(predicate), object);
            }
        }
    }

    /// Term for a value in object position; lists become collections
    fn object_term<'t>(
        &self,
        value: &'t Value,
        labels: &mut BlankLabels,
        queue: &mut VecDeque<Nested<'t>>,
    ) -> Term {
        match value {
            Value::PlainString(s) => Term::string(s),
            Value::Link { iri, .. } => Term::iri(iri),
            Value::Literal { value, datatype } => Term::typed(value, datatype),
            Value::Struct(thing) => {
                let label = labels.for_thing(thing);
                queue.push_back(Nested::Struct(label.clone(), thing));
                Term::BlankNode(label)
            }
            Value::List { values, .. } => {
                let cells: Vec<BlankId> = values.iter().map(|_| labels.fresh()).collect();
                for (i, element) in values.iter().enumerate() {
                    queue.push_back(Nested::Cell {
                        label: cells[i].clone(),
                        value: element,
                        next: cells.get(i + 1).cloned(),
                    });
                }
                cells
                    .first()
                    .cloned()
                    .map_or_else(|| Term::iri(rdf::NIL), Term::BlankNode)
            }
        }
    }
}

fn has_ordered_list(value: &Value) -> bool {
    match value {
        Value::List { ordered, values } => *ordered || values.iter().any(has_ordered_list),
        Value::Struct(thing) => thing.properties().values().any(has_ordered_list),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thingraph_vocab::xsd;

    const TAGS: &str = "https://example.org/tags";

    fn export(things: &[Thing], encoding: ListEncoding) -> Graph {
        let namespaces = NamespaceRepository::defaults();
        ThingExporter::new(&namespaces)
            .with_list_encoding(encoding)
            .to_graph(things)
            .unwrap()
    }

    #[test]
    fn test_scalars() {
        let thing = Thing::builder()
            .identifier("https://example.org/a")
            .set_string("https://schema.org/name", "A")
            .set_literal("https://schema.org/age", "3", xsd::INTEGER)
            .set_link("https://schema.org/knows", "https://example.org/b")
            .build();
        let graph = export(&[thing], ListEncoding::Repeated);
        assert_eq!(graph.len(), 3);
        assert!(graph.iter().all(|t| t.s == Term::iri("https://example.org/a")));
        assert!(graph.iter().any(|t| t.o == Term::typed("3", xsd::INTEGER)));
    }

    #[test]
    fn test_repeated_lists_flatten() {
        let thing = Thing::builder()
            .identifier("https://example.org/a")
            .set(TAGS, Value::ordered(vec!["x".into(), "y".into()]))
            .build();
        let graph = export(&[thing], ListEncoding::Repeated);
        let objects: Vec<_> = graph.iter().map(|t| t.o.clone()).collect();
        assert_eq!(objects, vec![Term::string("x"), Term::string("y")]);
    }

    #[test]
    fn test_collection_encoding_builds_chain() {
        let thing = Thing::builder()
            .identifier("https://example.org/a")
            .set(TAGS, Value::ordered(vec!["x".into(), "y".into()]))
            .build();
        let graph = export(&[thing], ListEncoding::Collection);
        let lines: Vec<_> = graph.iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            vec![
                format!("<https://example.org/a> <{}> _:b0 .", TAGS),
                format!("_:b0 <{}> \"x\" .", rdf::FIRST),
                format!("_:b0 <{}> _:b1 .", rdf::REST),
                format!("_:b1 <{}> \"y\" .", rdf::FIRST),
                format!("_:b1 <{}> <{}> .", rdf::REST, rdf::NIL),
            ]
        );
        assert!(graph.prefixes.contains_key("rdf"));
    }

    #[test]
    fn test_nested_structs_follow_their_parent() {
        let inner = Thing::builder().set_string("https://schema.org/name", "in").build();
        let outer = Thing::builder()
            .identifier("https://example.org/a")
            .set("https://schema.org/z", inner)
            .set_string("https://schema.org/a", "first")
            .build();
        let second = Thing::builder()
            .identifier("https://example.org/b")
            .set_string("https://schema.org/name", "b")
            .build();
        let graph = export(&[outer, second], ListEncoding::Repeated);
        let subjects: Vec<_> = graph.iter().map(|t| t.s.to_string()).collect();
        assert_eq!(
            subjects,
            vec![
                "<https://example.org/a>",
                "<https://example.org/a>",
                "_:b0",
                "<https://example.org/b>",
            ]
        );
    }

    #[test]
    fn test_struct_identifier_used_as_label() {
        let inner = Thing::builder()
            .identifier("addr")
            .set_string("https://schema.org/city", "Lyon")
            .build();
        let outer = Thing::builder()
            .identifier("https://example.org/a")
            .set("https://schema.org/address", inner)
            .build();
        let graph = export(&[outer], ListEncoding::Repeated);
        assert_eq!(graph.triples()[0].o, Term::blank("addr"));
    }

    #[test]
    fn test_missing_identifier() {
        let namespaces = NamespaceRepository::defaults();
        let anonymous = Thing::builder().set_string("https://schema.org/name", "x").build();
        let err = ThingExporter::new(&namespaces).to_graph(&[anonymous]).unwrap_err();
        assert_eq!(err, ExportError::MissingIdentifier { index: 0 });
    }

    #[test]
    fn test_only_used_namespaces_are_declared() {
        let thing = Thing::builder()
            .identifier("https://example.org/a")
            .set_link("https://example.org/rel", "https://example.org/b")
            .set_string("https://example.org/label", "plain strings add no prefix")
            .build();
        let graph = export(&[thing], ListEncoding::Repeated);
        assert_eq!(graph.prefixes.len(), 1);
        assert_eq!(graph.prefixes.get("ex").map(String::as_str), Some("https://example.org/"));
    }

    #[test]
    fn test_list_encoding_from_str() {
        assert_eq!("collection".parse::<ListEncoding>(), Ok(ListEncoding::Collection));
        assert!("chain".parse::<ListEncoding>().is_err());
    }
}
