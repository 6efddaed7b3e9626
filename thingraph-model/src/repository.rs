//! In-memory Thing repository
//!
//! Not a database: get-by-identifier and list-all are the only queries.
//! Concurrent importers write disjoint subject sets; same-identifier writes
//! go through a [`MergePolicy`] or an optimistic version check.

use crate::error::RepositoryError;
use crate::value::Value;
use crate::Thing;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Storage collaborator for built Things
pub trait ThingRepository: Send + Sync {
    fn get(&self, iri: &str) -> Option<Arc<Thing>>;

    fn list_iri(&self) -> Vec<String>;

    /// Store unconditionally, replacing any previous Thing
    fn store(&self, thing: Thing) -> Result<(), RepositoryError>;
}

/// Resolution of a write that hits an existing identifier
pub trait MergePolicy: Send + Sync {
    fn merge(&self, existing: &Thing, incoming: Thing) -> Thing;
}

/// Incoming Thing replaces the stored one
#[derive(Debug, Default, Clone, Copy)]
pub struct Overwrite;

impl MergePolicy for Overwrite {
    fn merge(&self, _existing: &Thing, incoming: Thing) -> Thing {
        incoming
    }
}

/// Predicates are united; a predicate present on both sides becomes an
/// unordered list of the distinct values
#[derive(Debug, Default, Clone, Copy)]
pub struct UnionMerge;

impl MergePolicy for UnionMerge {
    fn merge(&self, existing: &Thing, incoming: Thing) -> Thing {
        let mut builder = existing.to_builder();
        for (predicate, value) in incoming.properties() {
            let merged = match builder.get(predicate) {
                None => value.clone(),
                Some(old) => union(old, value),
            };
            builder.put(predicate.as_str(), merged);
        }
        builder.build()
    }
}

fn union(old: &Value, new: &Value) -> Value {
    let mut values: Vec<Value> = match old {
        Value::List { values, .. } => values.clone(),
        scalar => vec![scalar.clone()],
    };
    let incoming: Vec<&Value> = match new {
        Value::List { values, .. } => values.iter().collect(),
        scalar => vec![scalar],
    };
    for value in incoming {
        if !values.contains(value) {
            values.push(value.clone());
        }
    }
    if values.len() == 1 {
        values.remove(0)
    } else {
        Value::unordered(values)
    }
}

#[derive(Debug)]
struct Versioned {
    version: u64,
    thing: Arc<Thing>,
}

/// Concurrent map-backed repository with per-identifier versions
///
/// Versions start at 1 on first store and grow by one per write; an absent
/// identifier has version 0.
#[derive(Debug, Default)]
pub struct MemoryThingRepository {
    items: DashMap<String, Versioned>,
}

impl MemoryThingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Stored Thing plus its version
    pub fn get_versioned(&self, iri: &str) -> Option<(Arc<Thing>, u64)> {
        self.items
            .get(iri)
            .map(|entry| (Arc::clone(&entry.thing), entry.version))
    }

    pub fn version(&self, iri: &str) -> u64 {
        self.items.get(iri).map_or(0, |entry| entry.version)
    }

    /// Compare-and-swap write: succeeds only if the stored version equals
    /// `expected_version`. Returns the new version.
    pub fn store_versioned(&self, thing: Thing, expected_version: u64) -> Result<u64, RepositoryError> {
        let iri = identifier_of(&thing)?;
        match self.items.entry(iri.clone()) {
            Entry::Occupied(mut occupied) => {
                let actual = occupied.get().version;
                if actual != expected_version {
                    return Err(RepositoryError::VersionConflict {
                        iri,
                        expected: expected_version,
                        actual,
                    });
                }
                let version = actual + 1;
                occupied.insert(Versioned {
                    version,
                    thing: Arc::new(thing),
                });
                trace!(%iri, version, "stored");
                Ok(version)
            }
            Entry::Vacant(vacant) => {
                if expected_version != 0 {
                    return Err(RepositoryError::VersionConflict {
                        iri,
                        expected: expected_version,
                        actual: 0,
                    });
                }
                vacant.insert(Versioned {
                    version: 1,
                    thing: Arc::new(thing),
                });
                trace!(%iri, version = 1, "stored");
                Ok(1)
            }
        }
    }

    /// Write resolving a same-identifier collision through `policy`
    pub fn store_merged(&self, thing: Thing, policy: &dyn MergePolicy) -> Result<u64, RepositoryError> {
        let iri = identifier_of(&thing)?;
        match self.items.entry(iri) {
            Entry::Occupied(mut occupied) => {
                let current = occupied.get();
                let merged = policy.merge(&current.thing, thing);
                let version = current.version + 1;
                debug!(iri = %occupied.key(), version, "merged into existing thing");
                occupied.insert(Versioned {
                    version,
                    thing: Arc::new(merged),
                });
                Ok(version)
            }
            Entry::Vacant(vacant) => {
                vacant.insert(Versioned {
                    version: 1,
                    thing: Arc::new(thing),
                });
                Ok(1)
            }
        }
    }

    /// Optimistic read-modify-write on one identifier.
    ///
    /// `op` receives the current Thing (if any) and returns the replacement,
    /// which must keep the identifier `iri`. The write is retried on version
    /// conflicts, up to `max_attempts` runs.
    pub fn with_retries<F>(&self, iri: &str, max_attempts: usize, mut op: F) -> Result<u64, RepositoryError>
    where
        F: FnMut(Option<&Thing>) -> Thing,
    {
        for attempt in 1..=max_attempts {
            let (current, version) = match self.get_versioned(iri) {
                Some((thing, version)) => (Some(thing), version),
                None => (None, 0),
            };
            let next = op(current.as_deref());
            let actual = identifier_of(&next)?;
            if actual != iri {
                return Err(RepositoryError::IdentifierMismatch {
                    iri: iri.to_string(),
                    actual,
                });
            }
            match self.store_versioned(next, version) {
                Ok(version) => return Ok(version),
                Err(RepositoryError::VersionConflict { .. }) => {
                    debug!(%iri, attempt, "version conflict, retrying");
                }
                Err(e) => return Err(e),
            }
        }
        Err(RepositoryError::RetriesExhausted {
            iri: iri.to_string(),
            attempts: max_attempts,
        })
    }
}

impl ThingRepository for MemoryThingRepository {
    fn get(&self, iri: &str) -> Option<Arc<Thing>> {
        self.items.get(iri).map(|entry| Arc::clone(&entry.thing))
    }

    fn list_iri(&self) -> Vec<String> {
        let mut iris: Vec<String> = self.items.iter().map(|e| e.key().clone()).collect();
        iris.sort();
        iris
    }

    fn store(&self, thing: Thing) -> Result<(), RepositoryError> {
        self.store_merged(thing, &Overwrite).map(|_| ())
    }
}

fn identifier_of(thing: &Thing) -> Result<String, RepositoryError> {
    thing
        .identifier()
        .map(str::to_string)
        .ok_or(RepositoryError::MissingIdentifier)
}
