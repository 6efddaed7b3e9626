//! Format-agnostic statement representation
//!
//! Readers of triple-based formats emit [`Triple`]s into a [`GraphSink`];
//! writers consume a [`Graph`]. The Thing importer and exporter sit on
//! either side of this layer.
//!
//! - IRIs are always stored expanded; compaction happens at output time.
//! - Literals always carry a datatype. Plain strings use `xsd:string`,
//!   language-tagged strings use `rdf:langString`.
//! - [`Graph`] has bag semantics.
//!
//! # Example
//!
//! ```
//! use thingraph_graph_ir::{Graph, Term};
//!
//! let mut graph = Graph::new();
//! graph.add_triple(
//!     Term::iri("https://example.org/alice"),
//!     Term::iri("https://schema.org/name"),
//!     Term::string("Alice"),
//! );
//! assert_eq!(graph.len(), 1);
//! ```

mod graph;
mod sink;
mod term;
mod triple;

pub use graph::{Graph, SubjectGroups};
pub use sink::{GraphCollectorSink, GraphSink};
pub use term::{BlankId, Term};
pub use triple::Triple;
