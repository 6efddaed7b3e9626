//! Namespace registry: prefix ⇄ IRI base, CURIE compaction and expansion

use std::collections::BTreeMap;
use thingraph_vocab::namespaces::DEFAULTS;

/// A prefix bound to an IRI base
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Namespace {
    pub prefix: String,
    pub iri: String,
}

impl Namespace {
    pub fn new(prefix: impl Into<String>, iri: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            iri: iri.into(),
        }
    }
}

/// Read-only prefix table
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NamespaceRepository {
    by_prefix: BTreeMap<String, String>,
}

impl NamespaceRepository {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builder() -> NamespaceRepositoryBuilder {
        NamespaceRepositoryBuilder::default()
    }

    /// Common vocabularies plus the project namespace
    pub fn defaults() -> Self {
        Self::defaults_builder().build()
    }

    /// Builder seeded with [`NamespaceRepository::defaults`]
    pub fn defaults_builder() -> NamespaceRepositoryBuilder {
        DEFAULTS
            .iter()
            .fold(Self::builder(), |b, (prefix, iri)| b.store(*prefix, *iri))
    }

    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.by_prefix.get(prefix).map(String::as_str)
    }

    /// Namespace with the longest base that prefixes `iri`
    ///
    /// Ties on base length (two prefixes for one base) go to the
    /// alphabetically first prefix.
    pub fn longest_match(&self, iri: &str) -> Option<Namespace> {
        self.by_prefix
            .iter()
            .filter(|(_, base)| !base.is_empty() && iri.starts_with(base.as_str()))
            .fold(None, |best: Option<(&String, &String)>, cand| match best {
                Some(b) if b.1.len() >= cand.1.len() => Some(b),
                _ => Some(cand),
            })
            .map(|(prefix, base)| Namespace::new(prefix.as_str(), base.as_str()))
    }

    /// `prefix:local` form, if some namespace yields a clean local part
    pub fn compact(&self, iri: &str) -> Option<String> {
        let ns = self.longest_match(iri)?;
        let local = &iri[ns.iri.len()..];
        if is_clean_local(local) {
            Some(format!("{}:{}", ns.prefix, local))
        } else {
            None
        }
    }

    /// Full IRI for a `prefix:local` CURIE with a known prefix
    pub fn expand(&self, curie: &str) -> Option<String> {
        let (prefix, local) = curie.split_once(':')?;
        if local.starts_with("//") {
            return None;
        }
        self.get(prefix).map(|base| format!("{}{}", base, local))
    }

    /// Namespaces in prefix order
    pub fn iter(&self) -> impl Iterator<Item = Namespace> + '_ {
        self.by_prefix
            .iter()
            .map(|(prefix, iri)| Namespace::new(prefix.as_str(), iri.as_str()))
    }

    pub fn len(&self) -> usize {
        self.by_prefix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_prefix.is_empty()
    }
}

fn is_clean_local(local: &str) -> bool {
    !local.contains(['/', '#', '?'])
        && !local.chars().any(char::is_whitespace)
        && !local.starts_with('.')
        && !local.ends_with('.')
}

/// Builder for [`NamespaceRepository`]
#[derive(Clone, Debug, Default)]
pub struct NamespaceRepositoryBuilder {
    by_prefix: BTreeMap<String, String>,
}

impl NamespaceRepositoryBuilder {
    /// Bind a prefix; a later binding of the same prefix wins
    pub fn store(mut self, prefix: impl Into<String>, iri: impl Into<String>) -> Self {
        self.by_prefix.insert(prefix.into(), iri.into());
        self
    }

    pub fn build(self) -> NamespaceRepository {
        NamespaceRepository {
            by_prefix: self.by_prefix,
        }
    }
}
