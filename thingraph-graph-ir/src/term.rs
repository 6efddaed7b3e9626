//! Statement terms: IRI, blank node, literal

use std::fmt;
use std::sync::Arc;
use thingraph_vocab::{rdf, xsd};

/// Blank node identifier
///
/// Scoped to one document or one export; carries no global meaning.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlankId(Arc<str>);

impl BlankId {
    /// Create from a label without the `_:` prefix
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(Arc::from(label.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.0)
    }
}

/// A term in subject, predicate or object position
///
/// # Invariants
///
/// - `Iri` holds an expanded IRI, never a CURIE.
/// - A `Literal` with a language tag has datatype `rdf:langString`.
/// - Predicates are always `Iri`.
///
/// Terms order as blank nodes, then IRIs, then literals.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    BlankNode(BlankId),

    Iri(Arc<str>),

    Literal {
        lexical: Arc<str>,
        datatype: Arc<str>,
        language: Option<Arc<str>>,
    },
}

impl Term {
    pub fn iri(iri: impl AsRef<str>) -> Self {
        Term::Iri(Arc::from(iri.as_ref()))
    }

    pub fn blank(label: impl AsRef<str>) -> Self {
        Term::BlankNode(BlankId::new(label))
    }

    /// `xsd:string` literal
    pub fn string(lexical: impl AsRef<str>) -> Self {
        Self::typed(lexical, xsd::STRING)
    }

    pub fn typed(lexical: impl AsRef<str>, datatype: impl AsRef<str>) -> Self {
        Term::Literal {
            lexical: Arc::from(lexical.as_ref()),
            datatype: Arc::from(datatype.as_ref()),
            language: None,
        }
    }

    /// `rdf:langString` literal
    pub fn lang_string(lexical: impl AsRef<str>, language: impl AsRef<str>) -> Self {
        Term::Literal {
            lexical: Arc::from(lexical.as_ref()),
            datatype: Arc::from(rdf::LANG_STRING),
            language: Some(Arc::from(language.as_ref())),
        }
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Term::BlankNode(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal { .. })
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_blank(&self) -> Option<&BlankId> {
        match self {
            Term::BlankNode(id) => Some(id),
            _ => None,
        }
    }

    /// `(lexical, datatype, language)` of a literal
    pub fn as_literal(&self) -> Option<(&str, &str, Option<&str>)> {
        match self {
            Term::Literal {
                lexical,
                datatype,
                language,
            } => Some((lexical, datatype, language.as_deref())),
            _ => None,
        }
    }
}

/// Escape a literal's lexical form for N-Triples/Turtle output
pub(crate) fn escape_literal(s: &str, out: &mut impl fmt::Write) -> fmt::Result {
    for c in s.chars() {
        match c {
            '\\' => out.write_str("\\\\")?,
            '"' => out.write_str("\\\"")?,
            '\n' => out.write_str("\\n")?,
            '\r' => out.write_str("\\r")?,
            '\t' => out.write_str("\\t")?,
            c if (c as u32) < 0x20 => write!(out, "\\u{:04X}", c as u32)?,
            c => out.write_char(c)?,
        }
    }
    Ok(())
}

/// N-Triples syntax
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{}>", iri),
            Term::BlankNode(id) => write!(f, "{}", id),
            Term::Literal {
                lexical,
                datatype,
                language,
            } => {
                f.write_str("\"")?;
                escape_literal(lexical, f)?;
                f.write_str("\"")?;
                if let Some(lang) = language {
                    write!(f, "@{}", lang)
                } else if &**datatype != xsd::STRING {
                    write!(f, "^^<{}>", datatype)
                } else {
                    Ok(())
                }
            }
        }
    }
}
