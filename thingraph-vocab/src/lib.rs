//! Vocabulary constants for thingraph
//!
//! This crate is the single place for the IRIs the rest of the workspace
//! refers to by name, organized by vocabulary:
//! - `rdf` - RDF vocabulary (http://www.w3.org/1999/02/22-rdf-syntax-ns#)
//! - `rdfs` - RDFS vocabulary (http://www.w3.org/2000/01/rdf-schema#)
//! - `xsd` - XSD vocabulary (http://www.w3.org/2001/XMLSchema#)
//! - `owl` - OWL vocabulary (http://www.w3.org/2002/07/owl#)
//! - `thingraph` - project vocabulary (datatypes and media type IRIs)
//! - `namespaces` - the default prefix table

/// RDF vocabulary constants
pub mod rdf {
    /// Namespace IRI
    pub const NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

    /// rdf:type IRI
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

    /// rdf:langString IRI
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

    /// rdf:JSON IRI
    pub const JSON: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#JSON";

    /// rdf:first IRI (collection cell value)
    pub const FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";

    /// rdf:rest IRI (collection cell tail)
    pub const REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";

    /// rdf:nil IRI (collection terminator)
    pub const NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
}

/// RDFS vocabulary constants
pub mod rdfs {
    /// Namespace IRI
    pub const NS: &str = "http://www.w3.org/2000/01/rdf-schema#";

    /// rdfs:label IRI
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

    /// rdfs:comment IRI
    pub const COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";

    /// rdfs:Class IRI
    pub const CLASS: &str = "http://www.w3.org/2000/01/rdf-schema#Class";
}

/// XSD vocabulary constants
pub mod xsd {
    /// Namespace IRI
    pub const NS: &str = "http://www.w3.org/2001/XMLSchema#";

    /// xsd:string IRI
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

    /// xsd:boolean IRI
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";

    /// xsd:integer IRI
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";

    /// xsd:long IRI
    pub const LONG: &str = "http://www.w3.org/2001/XMLSchema#long";

    /// xsd:int IRI
    pub const INT: &str = "http://www.w3.org/2001/XMLSchema#int";

    /// xsd:unsignedLong IRI
    pub const UNSIGNED_LONG: &str = "http://www.w3.org/2001/XMLSchema#unsignedLong";

    /// xsd:decimal IRI
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";

    /// xsd:double IRI
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";

    /// xsd:date IRI
    pub const DATE: &str = "http://www.w3.org/2001/XMLSchema#date";

    /// xsd:dateTime IRI
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";

    /// xsd:anyURI IRI
    pub const ANY_URI: &str = "http://www.w3.org/2001/XMLSchema#anyURI";

    /// Check if a datatype IRI is one of the integer types
    #[inline]
    pub fn is_integer_datatype(datatype_iri: &str) -> bool {
        matches!(datatype_iri, INTEGER | LONG | INT)
    }
}

/// OWL vocabulary constants
pub mod owl {
    /// Namespace IRI
    pub const NS: &str = "http://www.w3.org/2002/07/owl#";

    /// owl:Class IRI
    pub const CLASS: &str = "http://www.w3.org/2002/07/owl#Class";

    /// owl:sameAs IRI
    pub const SAME_AS: &str = "http://www.w3.org/2002/07/owl#sameAs";
}

/// Project vocabulary
pub mod thingraph {
    /// Namespace IRI
    pub const NS: &str = "https://thingraph.dev/";

    /// Datatype for file modification timestamps
    pub const FILE_TIME: &str = "https://thingraph.dev/FileTime";
}

/// Default namespace prefixes
///
/// `(prefix, namespace IRI)` pairs, in the order they are registered.
pub mod namespaces {
    pub const DEFAULTS: &[(&str, &str)] = &[
        ("thingraph", super::thingraph::NS),
        ("rdf", super::rdf::NS),
        ("rdfs", super::rdfs::NS),
        ("xsd", super::xsd::NS),
        ("owl", super::owl::NS),
        ("schema", "https://schema.org/"),
        ("foaf", "http://xmlns.com/foaf/0.1/"),
        ("dc", "http://purl.org/dc/elements/1.1/"),
        ("dcterms", "http://purl.org/dc/terms/"),
        ("ex", "https://example.org/"),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocab_iris_live_under_their_namespace() {
        assert!(rdf::FIRST.starts_with(rdf::NS));
        assert!(rdf::REST.starts_with(rdf::NS));
        assert!(xsd::DATE_TIME.starts_with(xsd::NS));
        assert!(rdfs::LABEL.starts_with(rdfs::NS));
    }

    #[test]
    fn test_default_prefixes_are_unique() {
        let mut prefixes: Vec<_> = namespaces::DEFAULTS.iter().map(|(p, _)| *p).collect();
        prefixes.sort();
        prefixes.dedup();
        assert_eq!(prefixes.len(), namespaces::DEFAULTS.len());
    }

    #[test]
    fn test_integer_family() {
        assert!(xsd::is_integer_datatype(xsd::LONG));
        assert!(!xsd::is_integer_datatype(xsd::DOUBLE));
    }
}
