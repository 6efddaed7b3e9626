//! Tokenizer for N-Triples and flat Turtle

use crate::error::ParseError;

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    /// `<...>`, escapes resolved, not yet resolved against a base
    Iri(String),
    /// `prefix:local`; an empty local part is the bare namespace
    PrefixedName { prefix: String, local: String },
    /// `_:label`, label only
    BlankNodeLabel(String),
    /// Quoted string, escapes resolved
    String(String),
    /// `@lang` after a string
    LangTag(String),
    DoubleCaret,
    Integer(String),
    Decimal(String),
    Double(String),
    True,
    False,
    /// The `a` keyword
    A,
    Dot,
    Semicolon,
    Comma,
    /// `@prefix`
    KwPrefix,
    /// `@base`
    KwBase,
    /// `PREFIX`
    KwSparqlPrefix,
    /// `BASE`
    KwSparqlBase,
    Eof,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character
    pub start: usize,
}

/// Split `input` into tokens, ending with [`TokenKind::Eof`]
pub fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut lexer = Lexer { input, pos: 0 };
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else if c == '#' {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        self.skip_trivia();
        let start = self.pos;
        let token = |kind| Ok(Token { kind, start });

        let Some(c) = self.peek() else {
            return token(TokenKind::Eof);
        };
        match c {
            '<' => {
                self.bump();
                token(TokenKind::Iri(self.iri_body(start)?))
            }
            '"' | '\'' => token(TokenKind::String(self.string(start, c)?)),
            '_' if self.peek_second() == Some(':') => {
                self.bump();
                self.bump();
                let label = self.name_run(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'));
                if label.is_empty() {
                    return Err(ParseError::lexer(start, "empty blank node label"));
                }
                token(TokenKind::BlankNodeLabel(label.to_string()))
            }
            '@' => {
                self.bump();
                let word = self.name_run(|c| c.is_ascii_alphanumeric() || c == '-');
                match word {
                    "" => Err(ParseError::lexer(start, "expected directive or language tag after '@'")),
                    "prefix" => token(TokenKind::KwPrefix),
                    "base" => token(TokenKind::KwBase),
                    lang => token(TokenKind::LangTag(lang.to_string())),
                }
            }
            '^' => {
                self.bump();
                if self.bump() == Some('^') {
                    token(TokenKind::DoubleCaret)
                } else {
                    Err(ParseError::lexer(start, "expected '^^'"))
                }
            }
            '.' if self.peek_second().is_some_and(|c| c.is_ascii_digit()) => token(self.number(start)?),
            '.' => {
                self.bump();
                token(TokenKind::Dot)
            }
            ';' => {
                self.bump();
                token(TokenKind::Semicolon)
            }
            ',' => {
                self.bump();
                token(TokenKind::Comma)
            }
            '[' | ']' | '(' | ')' => Err(ParseError::lexer(
                start,
                "anonymous node and collection syntax is not supported; use _:labels and rdf:first/rdf:rest",
            )),
            c if c.is_ascii_digit() || c == '+' || c == '-' => token(self.number(start)?),
            c if c == ':' || c.is_alphabetic() => token(self.word(start)?),
            other => Err(ParseError::lexer(start, format!("unexpected character {:?}", other))),
        }
    }

    /// Longest run of chars satisfying `accept`, minus trailing dots
    fn name_run(&mut self, accept: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&accept) {
            self.bump();
        }
        let mut run = &self.input[start..self.pos];
        while let Some(trimmed) = run.strip_suffix('.') {
            run = trimmed;
            self.pos -= 1;
        }
        run
    }

    fn word(&mut self, start: usize) -> Result<TokenKind, ParseError> {
        let word = self.name_run(|c| {
            c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':' | '%') || !c.is_ascii()
        });
        Ok(match word {
            "a" => TokenKind::A,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            w if w.eq_ignore_ascii_case("PREFIX") => TokenKind::KwSparqlPrefix,
            w if w.eq_ignore_ascii_case("BASE") => TokenKind::KwSparqlBase,
            w => match w.split_once(':') {
                Some((prefix, local)) => TokenKind::PrefixedName {
                    prefix: prefix.to_string(),
                    local: local.to_string(),
                },
                None => return Err(ParseError::lexer(start, format!("unexpected word {:?}", w))),
            },
        })
    }

    fn digits(&mut self) -> usize {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        self.pos - start
    }

    fn number(&mut self, start: usize) -> Result<TokenKind, ParseError> {
        if matches!(self.peek(), Some('+' | '-')) {
            self.bump();
        }
        let mut count = self.digits();
        let mut decimal = false;
        if self.peek() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            count += self.digits();
            decimal = true;
        }
        if count == 0 {
            return Err(ParseError::lexer(start, "expected digits"));
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            if self.digits() == 0 {
                return Err(ParseError::lexer(start, "expected exponent digits"));
            }
            return Ok(TokenKind::Double(self.input[start..self.pos].to_string()));
        }
        let text = self.input[start..self.pos].to_string();
        Ok(if decimal {
            TokenKind::Decimal(text)
        } else {
            TokenKind::Integer(text)
        })
    }

    fn iri_body(&mut self, start: usize) -> Result<String, ParseError> {
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('>') => return Ok(out),
                Some('\\') => match self.bump() {
                    Some(u @ ('u' | 'U')) => out.push(self.unicode_escape(u)?),
                    other => return Err(ParseError::InvalidEscape(format!("\\{}", other.unwrap_or(' ')))),
                },
                Some(c) if c.is_whitespace() || c == '<' => {
                    return Err(ParseError::lexer(start, "invalid character in IRI"))
                }
                Some(c) => out.push(c),
                None => return Err(ParseError::lexer(start, "unterminated IRI")),
            }
        }
    }

    fn string(&mut self, start: usize, quote: char) -> Result<String, ParseError> {
        let long_delim: String = std::iter::repeat(quote).take(3).collect();
        let long = self.rest().starts_with(&long_delim);
        let skip = if long { 3 } else { 1 };
        for _ in 0..skip {
            self.bump();
        }

        let mut out = String::new();
        loop {
            if long && self.rest().starts_with(&long_delim) {
                for _ in 0..3 {
                    self.bump();
                }
                return Ok(out);
            }
            match self.bump() {
                None => return Err(ParseError::lexer(start, "unterminated string")),
                Some(c) if !long && c == quote => return Ok(out),
                Some('\n' | '\r') if !long => {
                    return Err(ParseError::lexer(start, "line break in short string"))
                }
                Some('\\') => out.push(self.escape()?),
                Some(c) => out.push(c),
            }
        }
    }

    fn escape(&mut self) -> Result<char, ParseError> {
        Ok(match self.bump() {
            Some('t') => '\t',
            Some('b') => '\u{8}',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('f') => '\u{c}',
            Some('"') => '"',
            Some('\'') => '\'',
            Some('\\') => '\\',
            Some(u @ ('u' | 'U')) => self.unicode_escape(u)?,
            Some(other) => return Err(ParseError::InvalidEscape(format!("\\{}", other))),
            None => return Err(ParseError::InvalidEscape("\\".to_string())),
        })
    }

    fn unicode_escape(&mut self, marker: char) -> Result<char, ParseError> {
        let len = if marker == 'u' { 4 } else { 8 };
        let hex = self.rest().get(..len).unwrap_or_default();
        let code = (hex.len() == len)
            .then(|| u32::from_str_radix(hex, 16).ok())
            .flatten()
            .and_then(char::from_u32)
            .ok_or_else(|| ParseError::InvalidEscape(format!("\\{}{}", marker, hex)))?;
        self.pos += len;
        Ok(code)
    }
}
