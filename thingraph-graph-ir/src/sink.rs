//! GraphSink: event interface between statement producers and consumers
//!
//! Readers and the Thing exporter call `start_graph`, then any number of
//! `on_base`/`on_prefix`/`emit_triple` events, then `end_graph`. A sink may
//! collect the events into a [`Graph`] or write them out directly.

use crate::{Graph, Term, Triple};

/// Receiver of graph events
///
/// # Example
///
/// ```
/// use thingraph_graph_ir::{GraphCollectorSink, GraphSink, Term};
///
/// let mut sink = GraphCollectorSink::new();
/// sink.start_graph();
/// sink.on_prefix("schema", "https://schema.org/");
/// sink.emit_triple(
///     Term::iri("https://example.org/alice"),
///     Term::iri("https://schema.org/name"),
///     Term::string("Alice"),
/// );
/// sink.end_graph();
///
/// let graph = sink.finish();
/// assert_eq!(graph.len(), 1);
/// ```
pub trait GraphSink {
    fn start_graph(&mut self) {}

    /// `@base <...>` in Turtle
    fn on_base(&mut self, base_iri: &str);

    /// `@prefix p: <...>` in Turtle, a context entry in JSON-LD
    fn on_prefix(&mut self, prefix: &str, namespace_iri: &str);

    fn emit_triple(&mut self, subject: Term, predicate: Term, object: Term);

    fn end_graph(&mut self) {}
}

/// Sink collecting every event into a [`Graph`]
#[derive(Debug, Default)]
pub struct GraphCollectorSink {
    graph: Graph,
}

impl GraphCollectorSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn finish(self) -> Graph {
        self.graph
    }
}

impl GraphSink for GraphCollectorSink {
    fn on_base(&mut self, base_iri: &str) {
        self.graph.set_base(base_iri);
    }

    fn on_prefix(&mut self, prefix: &str, namespace_iri: &str) {
        self.graph.add_prefix(prefix, namespace_iri);
    }

    fn emit_triple(&mut self, subject: Term, predicate: Term, object: Term) {
        self.graph.add(Triple::new(subject, predicate, object));
    }
}

impl<S: GraphSink + ?Sized> GraphSink for &mut S {
    fn start_graph(&mut self) {
        (**self).start_graph();
    }

    fn on_base(&mut self, base_iri: &str) {
        (**self).on_base(base_iri);
    }

    fn on_prefix(&mut self, prefix: &str, namespace_iri: &str) {
        (**self).on_prefix(prefix, namespace_iri);
    }

    fn emit_triple(&mut self, subject: Term, predicate: Term, object: Term) {
        (**self).emit_triple(subject, predicate, object);
    }

    fn end_graph(&mut self) {
        (**self).end_graph();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl GraphSink for Recorder {
        fn start_graph(&mut self) {
            self.0.push("start".into());
        }
        fn on_base(&mut self, base_iri: &str) {
            self.0.push(format!("base {}", base_iri));
        }
        fn on_prefix(&mut self, prefix: &str, _namespace_iri: &str) {
            self.0.push(format!("prefix {}", prefix));
        }
        fn emit_triple(&mut self, subject: Term, _predicate: Term, _object: Term) {
            self.0.push(format!("triple {}", subject));
        }
        fn end_graph(&mut self) {
            self.0.push("end".into());
        }
    }

    #[test]
    fn test_collector_sink() {
        let mut sink = GraphCollectorSink::new();
        sink.on_base("https://example.org/");
        sink.on_prefix("schema", "https://schema.org/");
        sink.emit_triple(
            Term::iri("https://example.org/alice"),
            Term::iri("https://schema.org/name"),
            Term::string("Alice"),
        );
        let graph = sink.finish();
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.base.as_deref(), Some("https://example.org/"));
        assert_eq!(graph.prefixes.len(), 1);
    }

    #[test]
    fn test_events_through_mut_reference() {
        fn drive(mut sink: impl GraphSink) {
            sink.start_graph();
            sink.on_prefix("ex", "https://example.org/");
            sink.emit_triple(Term::blank("b0"), Term::iri("https://example.org/p"), Term::string("x"));
            sink.end_graph();
        }

        let mut recorder = Recorder::default();
        drive(&mut recorder);
        assert_eq!(recorder.0, vec!["start", "prefix ex", "triple _:b0", "end"]);
    }
}
