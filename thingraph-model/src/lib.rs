//! # Thingraph value model
//!
//! Format-agnostic property-graph model shared by every converter:
//!
//! - [`Thing`] / [`ThingBuilder`]: immutable graph nodes and their two-phase builder
//! - [`Value`]: closed set of property value kinds
//! - [`DatatypeRepository`]: literal datatypes, codecs and match patterns
//! - [`NamespaceRepository`]: prefix table for CURIE compaction
//! - [`MemoryThingRepository`]: concurrent in-memory store with optimistic versions
//!
//! Things cross process and format boundaries in a single serde wire shape,
//! see the `wire` module.

pub mod datatype;
pub mod error;
pub mod namespace;
pub mod repository;
pub mod thing;
pub mod value;
mod wire;

pub use datatype::{Codec, Datatype, DatatypeRepository, DatatypeRepositoryBuilder, TypedValue};
pub use error::{DatatypeError, RepositoryError, Result, ThingError};
pub use namespace::{Namespace, NamespaceRepository, NamespaceRepositoryBuilder};
pub use repository::{MemoryThingRepository, MergePolicy, Overwrite, ThingRepository, UnionMerge};
pub use thing::{Thing, ThingBuilder};
pub use value::{Value, ValueKind};
