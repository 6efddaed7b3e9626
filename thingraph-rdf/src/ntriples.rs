//! N-Triples reading and writing

use std::fmt::Write;

use thingraph_graph_ir::Graph;

pub use crate::reader::parse;

/// One statement per line; prefixes and base are not written
pub fn write(graph: &Graph) -> String {
    let mut out = String::new();
    for triple in graph {
        // writing to a String cannot fail
        let _ = writeln!(out, "{}", triple);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use thingraph_graph_ir::{GraphCollectorSink, Term};

    #[test]
    fn test_write_then_read() {
        let mut graph = Graph::new();
        graph.add_triple(
            Term::iri("https://example.org/a"),
            Term::iri("https://schema.org/name"),
            Term::string("tab\there \"quoted\""),
        );
        graph.add_triple(
            Term::blank("b0"),
            Term::iri("https://schema.org/age"),
            Term::typed("7", thingraph_vocab::xsd::INTEGER),
        );
        let text = write(&graph);
        assert_eq!(text.lines().count(), 2);

        let mut sink = GraphCollectorSink::new();
        parse(&text, &mut sink).unwrap();
        assert_eq!(sink.finish().triples(), graph.triples());
    }
}
