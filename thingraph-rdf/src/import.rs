//! Statements → Things
//!
//! # Algorithm
//!
//! One pass over the statements groups them by subject:
//! - named subjects accumulate into one pending Thing each, in first-seen order
//! - blank subjects accumulate into anonymous structs
//! - `rdf:first`/`rdf:rest` on a blank subject go into a cons cell instead
//!
//! A blank node in object position may be described further down the stream,
//! so the object is recorded as a deferred reference. Once the pass is done,
//! every deferred reference is resolved exactly once: to a `Struct` when the
//! blank node has properties, to an ordered `List` when it heads a first/rest
//! chain, and to [`ImportError::UnresolvedReference`] otherwise.
//!
//! A predicate with one object becomes a scalar value; with several objects it
//! becomes an unordered list in statement order. Identical statements count
//! once. An `rdf:nil` object is the empty ordered list.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use thingraph_graph_ir::{BlankId, Graph, Term, Triple};
use thingraph_model::{DatatypeRepository, Thing, Value};
use thingraph_vocab::{rdf, xsd};
use tracing::{debug, trace, warn};

use crate::error::ImportError;

/// Rebuilds Things from an unordered statement stream
#[derive(Debug, Clone, Copy)]
pub struct ThingImporter<'a> {
    datatypes: &'a DatatypeRepository,
}

/// An object whose Value may still depend on blank nodes seen later
#[derive(Debug, Clone)]
enum Pending {
    Ready(Value),
    Anon(BlankId),
}

#[derive(Debug, Default)]
struct Node {
    identifier: Option<String>,
    properties: BTreeMap<String, Vec<Pending>>,
}

#[derive(Debug, Default)]
struct Cell {
    first: Option<Pending>,
    rest: Option<Term>,
}

#[derive(Debug, Default)]
struct State {
    named: Vec<Node>,
    named_index: HashMap<Arc<str>, usize>,
    anon: HashMap<BlankId, Node>,
    cells: HashMap<BlankId, Cell>,
    /// cells reached by at least one chain walk
    walked: HashSet<BlankId>,
    resolved: HashMap<BlankId, Value>,
    visiting: HashSet<BlankId>,
}

impl<'a> ThingImporter<'a> {
    pub fn new(datatypes: &'a DatatypeRepository) -> Self {
        Self { datatypes }
    }

    /// Import every named subject of `graph`
    pub fn import_graph(&self, graph: &Graph) -> Result<Vec<Thing>, ImportError> {
        self.import(graph.iter().cloned())
    }

    /// Import every named subject of `triples`, in first-appearance order
    pub fn import<I>(&self, triples: I) -> Result<Vec<Thing>, ImportError>
    where
        I: IntoIterator<Item = Triple>,
    {
        let mut state = State::default();
        let mut seen = HashSet::new();
        let mut count = 0usize;

        for triple in triples {
            if !seen.insert(triple.clone()) {
                trace!(%triple, "duplicate statement");
                continue;
            }
            count += 1;
            self.accept(&mut state, triple)?;
        }

        let named = std::mem::take(&mut state.named);
        let things = named
            .into_iter()
            .map(|node| state.finish(node))
            .collect::<Result<Vec<_>, _>>()?;

        for blank in state.anon.keys() {
            debug!(%blank, "dropping unreferenced blank node");
        }
        for blank in state.cells.keys().filter(|b| !state.walked.contains(*b)) {
            debug!(%blank, "dropping unreferenced collection cell");
        }
        debug!(statements = count, things = things.len(), "imported statements");
        Ok(things)
    }

    fn accept(&self, state: &mut State, triple: Triple) -> Result<(), ImportError> {
        let Triple { s, p, o } = triple;
        let predicate = match p {
            Term::Iri(iri) => iri,
            other => {
                return Err(ImportError::InvalidStatement(format!(
                    "predicate {} is not an IRI",
                    other
                )))
            }
        };

        match s {
            Term::Iri(iri) => {
                let object = self.object(&predicate, o)?;
                state.named_node(iri).push(&predicate, object);
            }
            Term::BlankNode(blank) if &*predicate == rdf::FIRST => {
                let object = self.object(&predicate, o)?;
                let cell = state.cells.entry(blank.clone()).or_default();
                if cell.first.replace(object).is_some() {
                    return Err(ImportError::MalformedCollection {
                        blank,
                        message: "several rdf:first values".to_string(),
                    });
                }
            }
            Term::BlankNode(blank) if &*predicate == rdf::REST => {
                let cell = state.cells.entry(blank.clone()).or_default();
                if cell.rest.replace(o).is_some() {
                    return Err(ImportError::MalformedCollection {
                        blank,
                        message: "several rdf:rest values".to_string(),
                    });
                }
            }
            Term::BlankNode(blank) => {
                let object = self.object(&predicate, o)?;
                state.anon.entry(blank).or_default().push(&predicate, object);
            }
            literal @ Term::Literal { .. } => {
                return Err(ImportError::InvalidStatement(format!(
                    "literal subject {}",
                    literal
                )));
            }
        }
        Ok(())
    }

    /// Convert an object term; blank nodes are deferred
    fn object(&self, predicate: &str, object: Term) -> Result<Pending, ImportError> {
        match object {
            Term::Iri(iri) if &*iri == rdf::NIL => Ok(Pending::Ready(Value::ordered(Vec::new()))),
            Term::Iri(iri) => Ok(Pending::Ready(Value::link(&*iri))),
            Term::BlankNode(blank) => Ok(Pending::Anon(blank)),
            Term::Literal {
                lexical,
                datatype,
                language,
            } => {
                if let Some(language) = language {
                    return Err(ImportError::LanguageTagged {
                        predicate: predicate.to_string(),
                        lexical: lexical.to_string(),
                        language: language.to_string(),
                    });
                }
                if &*datatype == xsd::STRING {
                    return Ok(Pending::Ready(Value::string(&*lexical)));
                }
                self.check_literal(&lexical, &datatype);
                Ok(Pending::Ready(Value::literal(&*lexical, &*datatype)))
            }
        }
    }

    /// Validate a literal against its datatype; failures keep the raw pair
    fn check_literal(&self, lexical: &str, datatype: &str) {
        match self.datatypes.get(datatype) {
            Some(dt) => {
                if let Err(e) = dt.parse(lexical) {
                    warn!(%datatype, lexical, error = %e, "keeping unparseable literal as raw text");
                }
            }
            None => trace!(%datatype, "literal with unregistered datatype"),
        }
    }
}

impl Node {
    fn push(&mut self, predicate: &str, object: Pending) {
        match self.properties.get_mut(predicate) {
            Some(objects) => objects.push(object),
            None => {
                self.properties.insert(predicate.to_string(), vec![object]);
            }
        }
    }
}

impl State {
    fn named_node(&mut self, iri: Arc<str>) -> &mut Node {
        let idx = match self.named_index.get(&iri) {
            Some(&idx) => idx,
            None => {
                let idx = self.named.len();
                self.named.push(Node {
                    identifier: Some(iri.to_string()),
                    properties: BTreeMap::new(),
                });
                self.named_index.insert(iri, idx);
                idx
            }
        };
        &mut self.named[idx]
    }

    /// Freeze a pending node, resolving its deferred references
    fn finish(&mut self, node: Node) -> Result<Thing, ImportError> {
        let mut builder = Thing::builder();
        if let Some(identifier) = node.identifier {
            builder.set_identifier(identifier);
        }
        for (predicate, objects) in node.properties {
            let mut values = Vec::with_capacity(objects.len());
            for object in objects {
                values.push(self.realize(&predicate, object)?);
            }
            let value = if values.len() == 1 {
                values.remove(0)
            } else {
                Value::unordered(values)
            };
            builder.put(predicate, value);
        }
        Ok(builder.build())
    }

    fn realize(&mut self, predicate: &str, object: Pending) -> Result<Value, ImportError> {
        match object {
            Pending::Ready(value) => Ok(value),
            Pending::Anon(blank) => self.resolve(predicate, &blank),
        }
    }

    fn resolve(&mut self, predicate: &str, blank: &BlankId) -> Result<Value, ImportError> {
        if let Some(value) = self.resolved.get(blank) {
            return Ok(value.clone());
        }
        if !self.visiting.insert(blank.clone()) {
            return Err(ImportError::Cycle {
                blank: blank.clone(),
            });
        }

        let value = if let Some(node) = self.anon.remove(blank) {
            if self.cells.remove(blank).is_some() {
                debug!(%blank, "blank node has other properties; ignoring its rdf:first/rdf:rest");
            }
            Value::structure(self.finish(node)?)
        } else if self.cells.contains_key(blank) {
            self.collect_list(blank)?
        } else {
            return Err(ImportError::UnresolvedReference {
                blank: blank.clone(),
                predicate: predicate.to_string(),
            });
        };

        self.visiting.remove(blank);
        self.resolved.insert(blank.clone(), value.clone());
        Ok(value)
    }

    /// Chase a first/rest chain into an ordered list
    fn collect_list(&mut self, head: &BlankId) -> Result<Value, ImportError> {
        let mut values = Vec::new();
        let mut chain = HashSet::new();
        let mut current = head.clone();
        loop {
            if !chain.insert(current.clone()) {
                return Err(ImportError::Cycle { blank: current });
            }
            let malformed = |blank: &BlankId, message: &str| ImportError::MalformedCollection {
                blank: blank.clone(),
                message: message.to_string(),
            };
            // not consumed: another reference may enter the chain mid-way
            let (first, rest) = match self.cells.get(&current) {
                Some(cell) => (cell.first.clone(), cell.rest.clone()),
                None => return Err(malformed(&current, "chain continues into an undescribed node")),
            };
            self.walked.insert(current.clone());
            let first = first.ok_or_else(|| malformed(&current, "cell has no rdf:first"))?;
            values.push(self.realize(rdf::FIRST, first)?);
            match rest {
                Some(Term::Iri(iri)) if &*iri == rdf::NIL => break,
                Some(Term::BlankNode(next)) => current = next,
                Some(other) => {
                    return Err(malformed(
                        &current,
                        &format!("rdf:rest is {}, expected a blank node or rdf:nil", other),
                    ))
                }
                None => return Err(malformed(&current, "cell has no rdf:rest")),
            }
        }
        trace!(%head, len = values.len(), "materialized collection");
        Ok(Value::ordered(values))
    }
}
