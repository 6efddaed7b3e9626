//! Turtle reading and writing
//!
//! Reading accepts the flat subset described in [`crate::reader`]. Writing
//! declares the graph's prefixes, compacts IRIs against them, and groups
//! consecutive statements about one subject with `;` and `,`.

use std::fmt::Write;

use thingraph_graph_ir::{Graph, Term};
use thingraph_model::NamespaceRepository;
use thingraph_vocab::{rdf, xsd};

pub use crate::reader::parse;

/// Render `graph` as Turtle
pub fn write(graph: &Graph) -> String {
    let namespaces = graph
        .prefixes
        .iter()
        .fold(NamespaceRepository::builder(), |b, (prefix, iri)| b.store(prefix.as_str(), iri.as_str()))
        .build();

    let mut out = String::new();
    if let Some(base) = &graph.base {
        let _ = writeln!(out, "@base <{}> .", base);
    }
    for ns in namespaces.iter() {
        let _ = writeln!(out, "@prefix {}: <{}> .", ns.prefix, ns.iri);
    }
    if graph.base.is_some() || !namespaces.is_empty() {
        out.push('\n');
    }

    for (subject, triples) in graph.group_by_subject() {
        out.push_str(&term(subject, &namespaces));
        let mut previous: Option<&Term> = None;
        for triple in triples {
            if previous == Some(&triple.p) {
                out.push_str(" , ");
            } else {
                if previous.is_some() {
                    out.push_str(" ;\n   ");
                }
                out.push(' ');
                out.push_str(&predicate(&triple.p, &namespaces));
                out.push(' ');
            }
            out.push_str(&term(&triple.o, &namespaces));
            previous = Some(&triple.p);
        }
        out.push_str(" .\n");
    }
    out
}

fn predicate(term: &Term, namespaces: &NamespaceRepository) -> String {
    match term.as_iri() {
        Some(rdf::TYPE) => "a".to_string(),
        _ => self::term(term, namespaces),
    }
}

fn term(term: &Term, namespaces: &NamespaceRepository) -> String {
    match term {
        Term::Iri(iri) => iri_ref(iri, namespaces),
        Term::BlankNode(id) => id.to_string(),
        Term::Literal {
            lexical,
            datatype,
            language,
        } => {
            let quoted = Term::string(&**lexical).to_string();
            match (language, &**datatype) {
                (Some(lang), _) => format!("{}@{}", quoted, lang),
                (None, xsd::STRING) => quoted,
                (None, xsd::INTEGER) if is_integer(lexical) => lexical.to_string(),
                (None, xsd::BOOLEAN) if matches!(&**lexical, "true" | "false") => lexical.to_string(),
                (None, dt) => format!("{}^^{}", quoted, iri_ref(dt, namespaces)),
            }
        }
    }
}

fn iri_ref(iri: &str, namespaces: &NamespaceRepository) -> String {
    namespaces
        .compact(iri)
        .filter(|curie| curie.split_once(':').is_some_and(|(_, local)| is_turtle_local(local)))
        .unwrap_or_else(|| format!("<{}>", iri))
}

fn is_turtle_local(local: &str) -> bool {
    local
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        && !local.starts_with(['-', '.'])
        && !local.ends_with('.')
}

fn is_integer(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}
