//! Datatype registry
//!
//! Maps datatype IRIs to lexical codecs (text ⇄ typed value) and optional
//! validating patterns.
//!
//! # Match order
//!
//! [`DatatypeRepository::match_text`] returns the *first* registered datatype
//! whose pattern matches, so registration order is part of the contract. The
//! standard repository registers boolean, then anyURI, then string. String's
//! pattern accepts any text, so it must come last.

use crate::error::DatatypeError;
use chrono::{DateTime, FixedOffset, NaiveDate};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;
use thingraph_vocab::{thingraph, xsd};

const BOOLEAN_PATTERN: &str = "true|True|TRUE|false|False|FALSE";
const IRI_PATTERN: &str = r"(<([a-zA-Z][a-zA-Z0-9+.\-]*:\S+)>)|([a-zA-Z][a-zA-Z0-9+.\-]*:\S+)";
const STRING_PATTERN: &str = r"(?s).*";

/// A literal parsed according to its datatype
#[derive(Clone, Debug, PartialEq)]
pub enum TypedValue {
    String(String),
    Boolean(bool),
    Iri(String),
    Integer(i64),
    UnsignedLong(u64),
    Double(f64),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
    /// Text of a datatype without a dedicated codec
    Lexical(String),
}

/// Text ⇄ value conversion for one family of datatypes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Codec {
    String,
    Boolean,
    Iri,
    Integer,
    UnsignedLong,
    Double,
    Date,
    DateTime,
    /// Keeps the lexical form as is
    Opaque,
}

impl Codec {
    fn parse(self, datatype: &str, text: &str) -> Result<TypedValue, DatatypeError> {
        let err = |message: String| DatatypeError::new(datatype, text, message);
        match self {
            Codec::String => Ok(TypedValue::String(text.to_string())),
            Codec::Opaque => Ok(TypedValue::Lexical(text.to_string())),
            Codec::Boolean => match text {
                "true" | "True" | "TRUE" | "1" => Ok(TypedValue::Boolean(true)),
                "false" | "False" | "FALSE" | "0" => Ok(TypedValue::Boolean(false)),
                _ => Err(err("not a boolean".to_string())),
            },
            Codec::Iri => {
                let iri = text
                    .strip_prefix('<')
                    .and_then(|t| t.strip_suffix('>'))
                    .unwrap_or(text);
                if iri.contains(':') && !iri.chars().any(char::is_whitespace) {
                    Ok(TypedValue::Iri(iri.to_string()))
                } else {
                    Err(err("not an absolute IRI".to_string()))
                }
            }
            Codec::Integer => text
                .trim()
                .parse::<i64>()
                .map(TypedValue::Integer)
                .map_err(|e| err(e.to_string())),
            Codec::UnsignedLong => text
                .trim()
                .parse::<u64>()
                .map(TypedValue::UnsignedLong)
                .map_err(|e| err(e.to_string())),
            Codec::Double => match text.trim() {
                "INF" | "+INF" => Ok(TypedValue::Double(f64::INFINITY)),
                "-INF" => Ok(TypedValue::Double(f64::NEG_INFINITY)),
                "NaN" => Ok(TypedValue::Double(f64::NAN)),
                other => other
                    .parse::<f64>()
                    .map(TypedValue::Double)
                    .map_err(|e| err(e.to_string())),
            },
            Codec::Date => NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
                .map(TypedValue::Date)
                .map_err(|e| err(e.to_string())),
            Codec::DateTime => DateTime::parse_from_rfc3339(text.trim())
                .map(TypedValue::DateTime)
                .map_err(|e| err(e.to_string())),
        }
    }

    fn format(self, datatype: &str, value: &TypedValue) -> Result<String, DatatypeError> {
        let text = match (self, value) {
            (Codec::String, TypedValue::String(s)) => s.clone(),
            (Codec::Opaque, TypedValue::Lexical(s) | TypedValue::String(s)) => s.clone(),
            (Codec::Boolean, TypedValue::Boolean(b)) => b.to_string(),
            (Codec::Iri, TypedValue::Iri(iri)) => iri.clone(),
            (Codec::Integer, TypedValue::Integer(i)) => i.to_string(),
            (Codec::UnsignedLong, TypedValue::UnsignedLong(u)) => u.to_string(),
            (Codec::Double, TypedValue::Double(d)) => format_double(*d),
            (Codec::Date, TypedValue::Date(d)) => d.format("%Y-%m-%d").to_string(),
            (Codec::DateTime, TypedValue::DateTime(dt)) => dt.to_rfc3339(),
            (codec, other) => {
                return Err(DatatypeError::new(
                    datatype,
                    format!("{:?}", other),
                    format!("{:?} codec cannot format this value", codec),
                ))
            }
        };
        Ok(text)
    }
}

fn format_double(d: f64) -> String {
    if d.is_nan() {
        "NaN".to_string()
    } else if d.is_infinite() {
        if d.is_sign_positive() {
            "INF".to_string()
        } else {
            "-INF".to_string()
        }
    } else {
        d.to_string()
    }
}

/// A datatype: IRI, optional validating pattern, codec
#[derive(Clone, Debug)]
pub struct Datatype {
    iri: String,
    pattern: Option<Regex>,
    codec: Codec,
}

impl Datatype {
    pub fn new(iri: impl Into<String>, codec: Codec) -> Self {
        Self {
            iri: iri.into(),
            pattern: None,
            codec,
        }
    }

    /// Attach a pattern; it must match the whole text to count as a match
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.pattern = Some(Regex::new(&format!("^(?:{})$", pattern))?);
        Ok(self)
    }

    pub fn iri(&self) -> &str {
        &self.iri
    }

    pub fn codec(&self) -> Codec {
        self.codec
    }

    pub fn pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    /// Whether `text` matches this datatype's pattern (false without one)
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.as_ref().is_some_and(|re| re.is_match(text))
    }

    pub fn parse(&self, text: &str) -> Result<TypedValue, DatatypeError> {
        self.codec.parse(&self.iri, text)
    }

    /// Canonical lexical form of a typed value
    pub fn format(&self, value: &TypedValue) -> Result<String, DatatypeError> {
        self.codec.format(&self.iri, value)
    }
}

impl PartialEq for Datatype {
    fn eq(&self, other: &Self) -> bool {
        self.iri == other.iri && self.codec == other.codec
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.iri)
    }
}

/// Read-only lookup of datatypes by IRI and by pattern
#[derive(Clone, Debug, Default)]
pub struct DatatypeRepository {
    datatypes: Vec<Datatype>,
    by_iri: HashMap<String, usize>,
}

impl DatatypeRepository {
    /// Repository without any datatype
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builder() -> DatatypeRepositoryBuilder {
        DatatypeRepositoryBuilder::default()
    }

    /// XSD datatypes plus the project ones, in match order
    pub fn standard() -> Self {
        static STANDARD: OnceLock<DatatypeRepository> = OnceLock::new();
        STANDARD
            .get_or_init(|| {
                Self::builder()
                    .store(patterned(xsd::BOOLEAN, Codec::Boolean, BOOLEAN_PATTERN))
                    .store(patterned(xsd::ANY_URI, Codec::Iri, IRI_PATTERN))
                    .store(patterned(xsd::STRING, Codec::String, STRING_PATTERN))
                    .store(Datatype::new(xsd::INTEGER, Codec::Integer))
                    .store(Datatype::new(xsd::LONG, Codec::Integer))
                    .store(Datatype::new(xsd::INT, Codec::Integer))
                    .store(Datatype::new(xsd::UNSIGNED_LONG, Codec::UnsignedLong))
                    .store(Datatype::new(xsd::DOUBLE, Codec::Double))
                    .store(Datatype::new(xsd::DECIMAL, Codec::Opaque))
                    .store(Datatype::new(xsd::DATE, Codec::Date))
                    .store(Datatype::new(xsd::DATE_TIME, Codec::DateTime))
                    .store(Datatype::new(thingraph::FILE_TIME, Codec::DateTime))
                    .build()
            })
            .clone()
    }

    /// Datatype for an IRI; `None` is an ordinary outcome, not a failure
    pub fn get(&self, iri: &str) -> Option<&Datatype> {
        self.by_iri.get(iri).map(|&idx| &self.datatypes[idx])
    }

    /// First datatype, in registration order, whose pattern matches `text`
    pub fn match_text(&self, text: &str) -> Option<&Datatype> {
        self.datatypes.iter().find(|dt| dt.matches(text))
    }

    pub fn list_iri(&self) -> impl Iterator<Item = &str> {
        self.datatypes.iter().map(Datatype::iri)
    }

    pub fn len(&self) -> usize {
        self.datatypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datatypes.is_empty()
    }
}

fn patterned(iri: &str, codec: Codec, pattern: &str) -> Datatype {
    Datatype::new(iri, codec)
        .with_pattern(pattern)
        .expect("built-in datatype pattern is valid")
}

/// Builder for [`DatatypeRepository`]
#[derive(Debug, Default)]
pub struct DatatypeRepositoryBuilder {
    datatypes: Vec<Datatype>,
}

impl DatatypeRepositoryBuilder {
    /// Register a datatype; re-registering an IRI replaces it in place
    pub fn store(mut self, datatype: Datatype) -> Self {
        match self.datatypes.iter().position(|dt| dt.iri == datatype.iri) {
            Some(idx) => self.datatypes[idx] = datatype,
            None => self.datatypes.push(datatype),
        }
        self
    }

    pub fn store_all(self, datatypes: impl IntoIterator<Item = Datatype>) -> Self {
        datatypes.into_iter().fold(self, |b, dt| b.store(dt))
    }

    pub fn build(self) -> DatatypeRepository {
        let by_iri = self
            .datatypes
            .iter()
            .enumerate()
            .map(|(idx, dt)| (dt.iri.clone(), idx))
            .collect();
        DatatypeRepository {
            datatypes: self.datatypes,
            by_iri,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_unknown_is_none() {
        let repo = DatatypeRepository::standard();
        assert!(repo.get("https://example.org/unknown").is_none());
        assert!(DatatypeRepository::empty().get(xsd::STRING).is_none());
    }

    #[test]
    fn test_match_uses_registration_order() {
        let repo = DatatypeRepository::standard();
        assert_eq!(repo.match_text("true").unwrap().iri(), xsd::BOOLEAN);
        assert_eq!(repo.match_text("FALSE").unwrap().iri(), xsd::BOOLEAN);
        assert_eq!(
            repo.match_text("https://example.org/x").unwrap().iri(),
            xsd::ANY_URI
        );
        assert_eq!(repo.match_text("<urn:x:y>").unwrap().iri(), xsd::ANY_URI);
        assert_eq!(repo.match_text("hello world").unwrap().iri(), xsd::STRING);
        assert_eq!(repo.match_text("multi\nline").unwrap().iri(), xsd::STRING);
    }

    #[test]
    fn test_misordered_registration_shadows_narrower_types() {
        let repo = DatatypeRepository::builder()
            .store(patterned(xsd::STRING, Codec::String, STRING_PATTERN))
            .store(patterned(xsd::ANY_URI, Codec::Iri, IRI_PATTERN))
            .store(patterned(xsd::BOOLEAN, Codec::Boolean, BOOLEAN_PATTERN))
            .build();
        assert_eq!(repo.match_text("true").unwrap().iri(), xsd::STRING);
        assert_eq!(repo.match_text("https://example.org/x").unwrap().iri(), xsd::STRING);
    }

    #[test]
    fn test_unpatterned_datatypes_never_match() {
        let repo = DatatypeRepository::builder()
            .store(Datatype::new(xsd::INTEGER, Codec::Integer))
            .build();
        assert!(repo.match_text("42").is_none());
        assert!(repo.get(xsd::INTEGER).is_some());
    }

    #[test]
    fn test_empty_repository() {
        let repo = DatatypeRepository::empty();
        assert!(repo.is_empty());
        assert!(repo.match_text("true").is_none());
        assert_eq!(repo.list_iri().count(), 0);
    }

    #[test]
    fn test_codecs_parse_and_format() {
        let repo = DatatypeRepository::standard();

        let int = repo.get(xsd::INTEGER).unwrap();
        assert_eq!(int.parse("-7").unwrap(), TypedValue::Integer(-7));
        assert_eq!(int.format(&TypedValue::Integer(-7)).unwrap(), "-7");

        let boolean = repo.get(xsd::BOOLEAN).unwrap();
        assert_eq!(boolean.parse("True").unwrap(), TypedValue::Boolean(true));
        assert_eq!(boolean.format(&TypedValue::Boolean(false)).unwrap(), "false");

        let double = repo.get(xsd::DOUBLE).unwrap();
        assert_eq!(double.parse("INF").unwrap(), TypedValue::Double(f64::INFINITY));
        assert_eq!(double.format(&TypedValue::Double(f64::NEG_INFINITY)).unwrap(), "-INF");

        let date = repo.get(xsd::DATE).unwrap();
        let parsed = date.parse("2024-02-29").unwrap();
        assert_eq!(date.format(&parsed).unwrap(), "2024-02-29");

        let date_time = repo.get(xsd::DATE_TIME).unwrap();
        let parsed = date_time.parse("2024-01-02T03:04:05+00:00").unwrap();
        assert_eq!(date_time.format(&parsed).unwrap(), "2024-01-02T03:04:05+00:00");

        let iri = repo.get(xsd::ANY_URI).unwrap();
        assert_eq!(
            iri.parse("<https://example.org/>").unwrap(),
            TypedValue::Iri("https://example.org/".to_string())
        );
    }

    #[test]
    fn test_parse_failure_is_datatype_error() {
        let repo = DatatypeRepository::standard();
        let err = repo.get(xsd::UNSIGNED_LONG).unwrap().parse("-1").unwrap_err();
        assert_eq!(err.datatype, xsd::UNSIGNED_LONG);
        assert_eq!(err.text, "-1");
    }

    #[test]
    fn test_format_kind_mismatch() {
        let repo = DatatypeRepository::standard();
        let err = repo
            .get(xsd::INTEGER)
            .unwrap()
            .format(&TypedValue::Boolean(true))
            .unwrap_err();
        assert_eq!(err.datatype, xsd::INTEGER);
    }

    #[test]
    fn test_store_replaces_in_place() {
        let repo = DatatypeRepository::builder()
            .store(Datatype::new(xsd::BOOLEAN, Codec::Opaque))
            .store(Datatype::new(xsd::STRING, Codec::String))
            .store(Datatype::new(xsd::BOOLEAN, Codec::Boolean))
            .build();
        let iris: Vec<_> = repo.list_iri().collect();
        assert_eq!(iris, vec![xsd::BOOLEAN, xsd::STRING]);
        assert_eq!(repo.get(xsd::BOOLEAN).unwrap().codec(), Codec::Boolean);
    }
}
