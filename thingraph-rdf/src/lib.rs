//! Things over statement streams.
//!
//! This crate rebuilds [`Thing`]s from RDF statements and emits them again,
//! with N-Triples, flat Turtle and JSON-LD on the text side.
//!
//! # Example
//!
//! ```
//! use thingraph_model::{DatatypeRepository, NamespaceRepository};
//! use thingraph_rdf::{things_from_text, things_to_turtle, ListEncoding};
//!
//! let turtle = r#"
//!     @prefix ex: <https://example.org/> .
//!     ex:alice ex:name "Alice" ;
//!              ex:age 30 .
//! "#;
//!
//! let things = things_from_text(turtle, &DatatypeRepository::standard()).unwrap();
//! assert_eq!(things[0].identifier(), Some("https://example.org/alice"));
//!
//! let text = things_to_turtle(&things, &NamespaceRepository::defaults(), ListEncoding::Repeated).unwrap();
//! assert!(text.contains("ex:alice"));
//! ```

pub mod error;
pub mod export;
pub mod import;
pub mod jsonld;
pub mod lex;
pub mod ntriples;
mod reader;
pub mod turtle;

pub use error::{ExportError, ImportError, JsonLdError, ParseError, RdfError, Result};
pub use export::{ListEncoding, ThingExporter};
pub use import::ThingImporter;
pub use jsonld::{from_jsonld, to_jsonld};
pub use reader::parse;

use thingraph_graph_ir::{Graph, GraphCollectorSink};
use thingraph_model::{DatatypeRepository, NamespaceRepository, Thing};

/// Parse N-Triples or flat Turtle into a [`Graph`]
pub fn parse_graph(input: &str) -> Result<Graph> {
    let mut sink = GraphCollectorSink::new();
    parse(input, &mut sink)?;
    Ok(sink.finish())
}

/// Parse N-Triples or flat Turtle straight into Things
pub fn things_from_text(input: &str, datatypes: &DatatypeRepository) -> Result<Vec<Thing>> {
    let graph = parse_graph(input)?;
    Ok(ThingImporter::new(datatypes).import_graph(&graph)?)
}

fn things_to_graph(
    things: &[Thing],
    namespaces: &NamespaceRepository,
    list_encoding: ListEncoding,
) -> Result<Graph> {
    Ok(ThingExporter::new(namespaces)
        .with_list_encoding(list_encoding)
        .to_graph(things)?)
}

/// Render Things as Turtle, declaring only the prefixes they use
pub fn things_to_turtle(
    things: &[Thing],
    namespaces: &NamespaceRepository,
    list_encoding: ListEncoding,
) -> Result<String> {
    Ok(turtle::write(&things_to_graph(things, namespaces, list_encoding)?))
}

/// Render Things as N-Triples
pub fn things_to_ntriples(
    things: &[Thing],
    namespaces: &NamespaceRepository,
    list_encoding: ListEncoding,
) -> Result<String> {
    Ok(ntriples::write(&things_to_graph(things, namespaces, list_encoding)?))
}
