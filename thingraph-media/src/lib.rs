//! Media types for resource conversion.
//!
//! - [`MediaType`]: parsed `type/subtype; name=value` with case rules applied
//! - [`MediaTypeProvider`]: pluggable source of known types and extensions
//! - [`MediaTypeRegistry`]: providers aggregated once, passed by reference
//! - [`MediaTypeDetector`]: declared type, content probe, extension, fallback
//!
//! ```
//! use thingraph_media::{DetectionRequest, MediaTypeDetector, MediaTypeRegistry};
//!
//! let registry = MediaTypeRegistry::standard().unwrap();
//! let detector = MediaTypeDetector::new(&registry);
//! let detected = detector.detect(&DetectionRequest::new("https://example.org/people.ttl"));
//! assert_eq!(detected.to_string(), "text/turtle; charset=utf-8");
//! ```

pub mod detector;
pub mod error;
pub mod media_type;
pub mod provider;
pub mod registry;

pub use detector::{local_path, yaml_charset, DetectionRequest, MediaTypeDetector};
pub use error::{MediaTypeError, Result};
pub use media_type::MediaType;
pub use provider::{
    standard_providers, MediaTypeProvider, RdfMediaTypes, StandardMediaTypes, StaticMediaTypes,
    ThingMediaTypes, YamlMediaTypes,
};
pub use registry::MediaTypeRegistry;
