//! A collection of statements plus the prefixes declared alongside them

use crate::{Term, Triple};
use std::collections::BTreeMap;

/// Statements in insertion order
///
/// Duplicates are kept (bag semantics); the importer collapses them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
    triples: Vec<Triple>,
    /// Base IRI declared by the source document
    pub base: Option<String>,
    /// Prefix mappings, deterministic order
    pub prefixes: BTreeMap<String, String>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_base(&mut self, base: impl Into<String>) {
        self.base = Some(base.into());
    }

    pub fn add_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    pub fn add(&mut self, triple: Triple) {
        self.triples.push(triple);
    }

    pub fn add_triple(&mut self, s: Term, p: Term, o: Term) {
        self.add(Triple::new(s, p, o));
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    /// Runs of consecutive statements sharing a subject
    ///
    /// A subject whose statements are not adjacent yields several runs.
    pub fn group_by_subject(&self) -> SubjectGroups<'_> {
        SubjectGroups {
            triples: &self.triples,
            index: 0,
        }
    }
}

impl IntoIterator for Graph {
    type Item = Triple;
    type IntoIter = std::vec::IntoIter<Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.into_iter()
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Triple;
    type IntoIter = std::slice::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<T: IntoIterator<Item = Triple>>(iter: T) -> Self {
        Graph {
            triples: iter.into_iter().collect(),
            ..Default::default()
        }
    }
}

impl Extend<Triple> for Graph {
    fn extend<T: IntoIterator<Item = Triple>>(&mut self, iter: T) {
        self.triples.extend(iter);
    }
}

/// Iterator returned by [`Graph::group_by_subject`]
pub struct SubjectGroups<'a> {
    triples: &'a [Triple],
    index: usize,
}

impl<'a> Iterator for SubjectGroups<'a> {
    type Item = (&'a Term, &'a [Triple]);

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.index;
        let subject = &self.triples.get(start)?.s;
        while self.index < self.triples.len() && self.triples[self.index].s == *subject {
            self.index += 1;
        }
        Some((subject, &self.triples[start..self.index]))
    }
}
