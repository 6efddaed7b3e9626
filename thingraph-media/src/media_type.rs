//! Content types with parameters

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::MediaTypeError;

pub const OCTET_STREAM: &str = "application/octet-stream";
pub const TEXT_PLAIN: &str = "text/plain";
pub const JSON: &str = "application/json";
pub const YAML: &str = "application/yaml";
pub const XML: &str = "application/xml";
pub const CBOR: &str = "application/cbor";
pub const TURTLE: &str = "text/turtle";
pub const N_TRIPLES: &str = "application/n-triples";
pub const JSON_LD: &str = "application/ld+json";
pub const THING_JSON: &str = "text/thing+json";
pub const THING_YAML: &str = "text/thing+yaml";
pub const THING_CBOR: &str = "application/thing+cbor";

/// A parsed media type such as `text/turtle; charset=utf-8`
///
/// Type, subtype and parameter names are lowercase; so is the `charset`
/// value. Parameters are kept sorted by name, so equality does not depend on
/// the order they were written in.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MediaType {
    type_: String,
    subtype: String,
    parameters: BTreeMap<String, String>,
}

impl MediaType {
    /// A media type without parameters
    ///
    /// Both parts are lowercased but not validated; use [`MediaType::parse`]
    /// for untrusted input.
    pub fn new(type_: &str, subtype: &str) -> Self {
        Self {
            type_: type_.to_ascii_lowercase(),
            subtype: subtype.to_ascii_lowercase(),
            parameters: BTreeMap::new(),
        }
    }

    pub fn parse(input: &str) -> Result<Self, MediaTypeError> {
        Parser::new(input).media_type()
    }

    /// `application/octet-stream`, the type of unknown binary content
    pub fn octet_stream() -> Self {
        Self::new("application", "octet-stream")
    }

    pub fn type_(&self) -> &str {
        &self.type_
    }

    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// `type/subtype` without parameters
    pub fn essence(&self) -> String {
        format!("{}/{}", self.type_, self.subtype)
    }

    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn with_parameter(mut self, name: &str, value: &str) -> Self {
        let name = name.to_ascii_lowercase();
        let value = if name == "charset" {
            value.to_ascii_lowercase()
        } else {
            value.to_string()
        };
        self.parameters.insert(name, value);
        self
    }

    pub fn with_charset(self, charset: &str) -> Self {
        self.with_parameter("charset", charset)
    }

    pub fn charset(&self) -> Option<&str> {
        self.parameter("charset")
    }

    pub fn without_parameters(&self) -> Self {
        Self {
            type_: self.type_.clone(),
            subtype: self.subtype.clone(),
            parameters: BTreeMap::new(),
        }
    }

    /// Same type and subtype, ignoring parameters
    pub fn essence_eq(&self, other: &MediaType) -> bool {
        self.type_ == other.type_ && self.subtype == other.subtype
    }

    pub fn is_text(&self) -> bool {
        self.type_ == "text"
    }

    /// The structured syntax suffix: `json` for `application/ld+json`
    pub fn structured_suffix(&self) -> Option<&str> {
        self.subtype.rsplit_once('+').map(|(_, suffix)| suffix)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_, self.subtype)?;
        for (name, value) in &self.parameters {
            if !value.is_empty() && value.chars().all(is_token_char) {
                write!(f, "; {}={}", name, value)?;
            } else {
                write!(f, "; {}=\"", name)?;
                for c in value.chars() {
                    if c == '"' || c == '\\' {
                        f.write_str("\\")?;
                    }
                    write!(f, "{}", c)?;
                }
                f.write_str("\"")?;
            }
        }
        Ok(())
    }
}

impl FromStr for MediaType {
    type Err = MediaTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// RFC 7230 `tchar`
fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c)
}

struct Parser<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    fn error(&self, message: impl Into<String>) -> MediaTypeError {
        MediaTypeError::parse(self.input, message)
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
    }

    fn token(&mut self, what: &str) -> Result<String, MediaTypeError> {
        let mut token = String::new();
        while let Some((_, c)) = self.chars.next_if(|(_, c)| is_token_char(*c)) {
            token.push(c);
        }
        if token.is_empty() {
            return Err(self.error(format!("expected {}", what)));
        }
        Ok(token)
    }

    fn quoted(&mut self) -> Result<String, MediaTypeError> {
        let mut value = String::new();
        loop {
            match self.chars.next() {
                Some((_, '"')) => return Ok(value),
                Some((_, '\\')) => match self.chars.next() {
                    Some((_, c)) => value.push(c),
                    None => break,
                },
                Some((_, c)) => value.push(c),
                None => break,
            }
        }
        Err(self.error("unterminated quoted parameter value"))
    }

    fn expect(&mut self, expected: char) -> Result<(), MediaTypeError> {
        match self.chars.next() {
            Some((_, c)) if c == expected => Ok(()),
            Some((pos, c)) => Err(self.error(format!("expected '{}' at {}, found '{}'", expected, pos, c))),
            None => Err(self.error(format!("expected '{}' at end of input", expected))),
        }
    }

    fn media_type(mut self) -> Result<MediaType, MediaTypeError> {
        self.skip_whitespace();
        let type_ = self.token("type")?;
        self.expect('/')?;
        let subtype = self.token("subtype")?;
        let mut media_type = MediaType::new(&type_, &subtype);

        loop {
            self.skip_whitespace();
            if self.chars.peek().is_none() {
                return Ok(media_type);
            }
            self.expect(';')?;
            self.skip_whitespace();
            // tolerate a trailing `;`
            if self.chars.peek().is_none() {
                return Ok(media_type);
            }
            let name = self.token("parameter name")?.to_ascii_lowercase();
            self.expect('=')?;
            let value = if self.chars.next_if(|(_, c)| *c == '"').is_some() {
                self.quoted()?
            } else {
                self.token("parameter value")?
            };
            if media_type.parameters.contains_key(&name) {
                return Err(self.error(format!("duplicate parameter '{}'", name)));
            }
            media_type = media_type.with_parameter(&name, &value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let mt = MediaType::parse("text/turtle").unwrap();
        assert_eq!(mt.type_(), "text");
        assert_eq!(mt.subtype(), "turtle");
        assert!(mt.parameters().is_empty());
        assert_eq!(mt.to_string(), "text/turtle");
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let mt = MediaType::parse("Application/LD+JSON; Charset=UTF-8").unwrap();
        assert_eq!(mt.essence(), "application/ld+json");
        assert_eq!(mt.charset(), Some("utf-8"));
        assert_eq!(mt.structured_suffix(), Some("json"));
    }

    #[test]
    fn test_quoted_parameter_values() {
        let mt = MediaType::parse(r#"multipart/mixed; boundary="a;b \"c\""; charset=utf-8"#).unwrap();
        assert_eq!(mt.parameter("boundary"), Some(r#"a;b "c""#));
        assert_eq!(mt.charset(), Some("utf-8"));
        assert_eq!(MediaType::parse(&mt.to_string()).unwrap(), mt);
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["", "text", "text/", "/plain", "text/plain; charset", "text/plain; a=\"x", "text/plain; a=1; a=2"] {
            assert!(MediaType::parse(bad).is_err(), "{:?} should not parse", bad);
        }
    }

    #[test]
    fn test_parameters_and_equality() {
        let a = MediaType::parse("text/plain; charset=utf-8; format=flowed").unwrap();
        let b = MediaType::parse("text/plain;format=flowed;charset=UTF-8;").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.without_parameters(), MediaType::new("text", "plain"));
        assert!(a.essence_eq(&MediaType::new("TEXT", "Plain")));
        assert!(a.is_text());
        assert_eq!(a.structured_suffix(), None);
    }
}
