//! Statement reader for N-Triples and flat Turtle, emitting to a GraphSink

use std::collections::HashMap;

use thingraph_graph_ir::{GraphSink, Term};
use thingraph_vocab::{rdf, xsd};
use tracing::trace;

use crate::error::ParseError;
use crate::lex::{tokenize, Token, TokenKind};

/// Parse `input` and emit its statements, prefixes and base to `sink`
///
/// Accepts N-Triples and the Turtle subset without `[...]`/`(...)` nesting.
pub fn parse<S: GraphSink + ?Sized>(input: &str, sink: &mut S) -> Result<(), ParseError> {
    Parser::new(input, sink)?.parse()
}

struct Parser<'a, S: ?Sized> {
    tokens: Vec<Token>,
    pos: usize,
    sink: &'a mut S,
    prefixes: HashMap<String, String>,
    base: Option<String>,
}

impl<'a, S: GraphSink + ?Sized> Parser<'a, S> {
    fn new(input: &str, sink: &'a mut S) -> Result<Self, ParseError> {
        Ok(Self {
            tokens: tokenize(input)?,
            pos: 0,
            sink,
            prefixes: HashMap::new(),
            base: None,
        })
    }

    fn parse(mut self) -> Result<(), ParseError> {
        self.sink.start_graph();
        let mut statements = 0usize;
        while !self.is_at_end() {
            self.parse_statement()?;
            statements += 1;
        }
        self.sink.end_graph();
        trace!(statements, "parsed statement document");
        Ok(())
    }

    fn is_at_end(&self) -> bool {
        matches!(self.current().kind, TokenKind::Eof)
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if !self.is_at_end() {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current().kind) == std::mem::discriminant(kind)
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&format!("{:?}", kind)))
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::parse(
            self.current().start,
            format!("expected {}, found {:?}", expected, self.current().kind),
        )
    }

    fn parse_statement(&mut self) -> Result<(), ParseError> {
        match self.current().kind {
            TokenKind::KwPrefix | TokenKind::KwSparqlPrefix => self.parse_prefix_directive(),
            TokenKind::KwBase | TokenKind::KwSparqlBase => self.parse_base_directive(),
            _ => self.parse_triples(),
        }
    }

    fn parse_prefix_directive(&mut self) -> Result<(), ParseError> {
        let sparql_style = matches!(self.advance().kind, TokenKind::KwSparqlPrefix);
        let prefix = match &self.current().kind {
            TokenKind::PrefixedName { prefix, local } if local.is_empty() => prefix.clone(),
            _ => return Err(self.unexpected("prefix namespace")),
        };
        self.advance();
        let namespace = match &self.current().kind {
            TokenKind::Iri(iri) => self.resolve_iri(iri)?,
            _ => return Err(self.unexpected("namespace IRI")),
        };
        self.advance();

        self.sink.on_prefix(&prefix, &namespace);
        self.prefixes.insert(prefix, namespace);
        if !sparql_style {
            self.expect(&TokenKind::Dot)?;
        }
        Ok(())
    }

    fn parse_base_directive(&mut self) -> Result<(), ParseError> {
        let sparql_style = matches!(self.advance().kind, TokenKind::KwSparqlBase);
        let base = match &self.current().kind {
            TokenKind::Iri(iri) => self.resolve_iri(iri)?,
            _ => return Err(self.unexpected("base IRI")),
        };
        self.advance();

        self.sink.on_base(&base);
        self.base = Some(base);
        if !sparql_style {
            self.expect(&TokenKind::Dot)?;
        }
        Ok(())
    }

    fn parse_triples(&mut self) -> Result<(), ParseError> {
        let subject = self.parse_subject()?;
        loop {
            let predicate = self.parse_verb()?;
            loop {
                let object = self.parse_object()?;
                self.sink.emit_triple(subject.clone(), predicate.clone(), object);
                if !self.check(&TokenKind::Comma) {
                    break;
                }
                self.advance();
            }
            if !self.check(&TokenKind::Semicolon) {
                break;
            }
            while self.check(&TokenKind::Semicolon) {
                self.advance();
            }
            if self.check(&TokenKind::Dot) {
                break;
            }
        }
        self.expect(&TokenKind::Dot)?;
        Ok(())
    }

    fn parse_subject(&mut self) -> Result<Term, ParseError> {
        match self.current().kind.clone() {
            TokenKind::BlankNodeLabel(label) => {
                self.advance();
                Ok(Term::blank(label))
            }
            _ => self.parse_iri("subject"),
        }
    }

    fn parse_verb(&mut self) -> Result<Term, ParseError> {
        if self.check(&TokenKind::A) {
            self.advance();
            return Ok(Term::iri(rdf::TYPE));
        }
        self.parse_iri("predicate")
    }

    fn parse_iri(&mut self, role: &str) -> Result<Term, ParseError> {
        let iri = match &self.current().kind {
            TokenKind::Iri(iri) => self.resolve_iri(iri)?,
            TokenKind::PrefixedName { prefix, local } => self.expand(prefix, local)?,
            _ => return Err(self.unexpected(role)),
        };
        self.advance();
        Ok(Term::iri(iri))
    }

    fn parse_object(&mut self) -> Result<Term, ParseError> {
        let typed = |lexical: String, datatype: &str| Term::typed(lexical, datatype);
        match self.current().kind.clone() {
            TokenKind::BlankNodeLabel(label) => {
                self.advance();
                Ok(Term::blank(label))
            }
            TokenKind::String(lexical) => {
                self.advance();
                match self.current().kind.clone() {
                    TokenKind::LangTag(lang) => {
                        self.advance();
                        Ok(Term::lang_string(lexical, lang))
                    }
                    TokenKind::DoubleCaret => {
                        self.advance();
                        let datatype = self.parse_iri("datatype IRI")?;
                        Ok(typed(lexical, datatype.as_iri().unwrap_or(xsd::STRING)))
                    }
                    _ => Ok(Term::string(lexical)),
                }
            }
            TokenKind::Integer(text) => {
                self.advance();
                Ok(typed(text, xsd::INTEGER))
            }
            TokenKind::Decimal(text) => {
                self.advance();
                Ok(typed(text, xsd::DECIMAL))
            }
            TokenKind::Double(text) => {
                self.advance();
                Ok(typed(text, xsd::DOUBLE))
            }
            TokenKind::True | TokenKind::False => {
                let text = if self.check(&TokenKind::True) { "true" } else { "false" };
                self.advance();
                Ok(typed(text.to_string(), xsd::BOOLEAN))
            }
            _ => self.parse_iri("object"),
        }
    }

    fn expand(&self, prefix: &str, local: &str) -> Result<String, ParseError> {
        self.prefixes
            .get(prefix)
            .map(|ns| format!("{}{}", ns, local))
            .ok_or_else(|| ParseError::UndefinedPrefix(prefix.to_string()))
    }

    fn resolve_iri(&self, iri: &str) -> Result<String, ParseError> {
        if has_scheme(iri) {
            return Ok(iri.to_string());
        }
        match &self.base {
            Some(base) => Ok(join(base, iri)),
            None => Err(ParseError::IriResolution(format!(
                "relative IRI <{}> without @base",
                iri
            ))),
        }
    }
}

fn has_scheme(iri: &str) -> bool {
    match iri.find(':') {
        Some(end) if end > 0 => iri[..end].chars().enumerate().all(|(i, c)| {
            if i == 0 {
                c.is_ascii_alphabetic()
            } else {
                c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')
            }
        }),
        _ => false,
    }
}

/// Reference resolution without dot-segment removal
fn join(base: &str, relative: &str) -> String {
    if relative.is_empty() {
        return base.to_string();
    }
    if relative.starts_with('#') {
        let stem = base.split('#').next().unwrap_or(base);
        return format!("{}{}", stem, relative);
    }
    if relative.starts_with("//") {
        let scheme = base.split(':').next().unwrap_or_default();
        return format!("{}:{}", scheme, relative);
    }
    if relative.starts_with('/') {
        let root_end = base
            .find("://")
            .and_then(|i| base[i + 3..].find('/').map(|j| i + 3 + j))
            .unwrap_or(base.len());
        return format!("{}{}", &base[..root_end], relative);
    }
    match base.rfind('/') {
        Some(i) => format!("{}{}", &base[..=i], relative),
        None => format!("{}{}", base, relative),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thingraph_graph_ir::{Graph, GraphCollectorSink};

    fn read(input: &str) -> Graph {
        let mut sink = GraphCollectorSink::new();
        parse(input, &mut sink).unwrap();
        sink.finish()
    }

    #[test]
    fn test_ntriples() {
        let graph = read(
            "<https://example.org/a> <https://schema.org/name> \"Alice\" .\n\
             <https://example.org/a> <https://schema.org/age> \"42\"^^<http://www.w3.org/2001/XMLSchema#integer> .\n\
             _:b0 <https://schema.org/name> \"x\"@en .\n",
        );
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.triples()[1].o, Term::typed("42", xsd::INTEGER));
        assert_eq!(graph.triples()[2].s, Term::blank("b0"));
        assert_eq!(graph.triples()[2].o, Term::lang_string("x", "en"));
    }

    #[test]
    fn test_flat_turtle() {
        let graph = read(
            r#"
            @prefix schema: <https://schema.org/> .
            PREFIX ex: <https://example.org/>

            ex:alice a schema:Person ;
                schema:name "Alice", "Ali" ;
                schema:age 42 ;
                schema:member true ;
                .
            "#,
        );
        assert_eq!(graph.len(), 5);
        assert_eq!(graph.prefixes.len(), 2);
        let t = &graph.triples()[0];
        assert_eq!(t.p.as_iri(), Some(rdf::TYPE));
        assert_eq!(t.o.as_iri(), Some("https://schema.org/Person"));
        assert_eq!(graph.triples()[3].o, Term::typed("42", xsd::INTEGER));
        assert_eq!(graph.triples()[4].o, Term::typed("true", xsd::BOOLEAN));
    }

    #[test]
    fn test_base_resolution() {
        let graph = read(
            "@base <https://example.org/docs/index> .\n\
             <#top> <../p> </root> .",
        );
        let t = &graph.triples()[0];
        assert_eq!(t.s.as_iri(), Some("https://example.org/docs/index#top"));
        assert_eq!(t.p.as_iri(), Some("https://example.org/docs/../p"));
        assert_eq!(t.o.as_iri(), Some("https://example.org/root"));
        assert_eq!(graph.base.as_deref(), Some("https://example.org/docs/index"));
    }

    #[test]
    fn test_undefined_prefix() {
        let mut sink = GraphCollectorSink::new();
        let err = parse("nope:a nope:b nope:c .", &mut sink).unwrap_err();
        assert_eq!(err, ParseError::UndefinedPrefix("nope".to_string()));
    }

    #[test]
    fn test_relative_iri_without_base() {
        let mut sink = GraphCollectorSink::new();
        let err = parse("<a> <https://example.org/p> <b> .", &mut sink).unwrap_err();
        assert!(matches!(err, ParseError::IriResolution(_)));
    }

    #[test]
    fn test_missing_dot_reports_position() {
        let mut sink = GraphCollectorSink::new();
        let err = parse("<https://e.org/a> <https://e.org/p> \"x\"", &mut sink).unwrap_err();
        assert!(matches!(err, ParseError::Parse { position: 39, .. }));
    }

    #[test]
    fn test_literal_subject_is_rejected() {
        let mut sink = GraphCollectorSink::new();
        assert!(parse("\"x\" <https://e.org/p> <https://e.org/o> .", &mut sink).is_err());
    }
}
