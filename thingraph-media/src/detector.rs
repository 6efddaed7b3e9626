//! Media-type detection
//!
//! Sources, in priority order:
//! 1. the declared content type, unless it is on the ignore list
//!    (`content/unknown`) or the imprecise list (`text/plain`,
//!    `application/octet-stream`)
//! 2. the leading bytes of local `file:` resources
//! 3. the file extension, via the registry
//!
//! An imprecise declared type is used when nothing better turns up;
//! otherwise the result is `application/octet-stream`. Detection never
//! fails.
//!
//! Charset: an explicit charset wins. Otherwise `text/*`, `application/json`
//! and `*+json` get the default charset, and the YAML family gets the
//! encoding implied by its first four bytes.

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use tracing::{debug, trace};

use crate::media_type::{self as mt, MediaType};
use crate::registry::MediaTypeRegistry;

const IGNORED: &[&str] = &["content/unknown"];
const IMPRECISE: &[&str] = &[mt::TEXT_PLAIN, mt::OCTET_STREAM];

/// Leading-byte signatures of binary formats
const SIGNATURES: &[(&[u8], &str)] = &[
    (b"%PDF-", "application/pdf"),
    (b"\x89PNG\r\n\x1a\n", "image/png"),
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
    (b"\xFF\xD8\xFF", "image/jpeg"),
    (b"PK\x03\x04", "application/zip"),
    (b"\x1F\x8B", "application/gzip"),
    // CBOR self-described tag 55799
    (b"\xD9\xD9\xF7", mt::CBOR),
];

const PROBE_LEN: usize = 16;

/// What is known about a resource before detection
#[derive(Debug, Clone, Copy, Default)]
pub struct DetectionRequest<'a> {
    pub iri: Option<&'a str>,
    pub content_type: Option<&'a str>,
    pub charset: Option<&'a str>,
    /// First bytes of the content, when the caller already has them
    pub leading_bytes: Option<&'a [u8]>,
}

impl<'a> DetectionRequest<'a> {
    pub fn new(iri: &'a str) -> Self {
        Self {
            iri: Some(iri),
            ..Self::default()
        }
    }

    pub fn with_content_type(mut self, content_type: &'a str) -> Self {
        self.content_type = Some(content_type);
        self
    }

    pub fn with_charset(mut self, charset: &'a str) -> Self {
        self.charset = Some(charset);
        self
    }

    pub fn with_leading_bytes(mut self, bytes: &'a [u8]) -> Self {
        self.leading_bytes = Some(bytes);
        self
    }
}

#[derive(Debug, Clone)]
pub struct MediaTypeDetector<'r> {
    registry: &'r MediaTypeRegistry,
    default_charset: String,
}

impl<'r> MediaTypeDetector<'r> {
    pub fn new(registry: &'r MediaTypeRegistry) -> Self {
        Self {
            registry,
            default_charset: "utf-8".to_string(),
        }
    }

    pub fn with_default_charset(mut self, charset: &str) -> Self {
        self.default_charset = charset.to_ascii_lowercase();
        self
    }

    pub fn registry(&self) -> &'r MediaTypeRegistry {
        self.registry
    }

    pub fn detect(&self, request: &DetectionRequest<'_>) -> MediaType {
        let declared = request.content_type.and_then(|ct| match MediaType::parse(ct) {
            Ok(media_type) => Some(self.registry.normalize(&media_type)),
            Err(e) => {
                debug!(content_type = ct, error = %e, "ignoring unparseable content type");
                None
            }
        });
        let declared = declared.filter(|m| !listed(IGNORED, m));

        let precise = declared.clone().filter(|m| !listed(IMPRECISE, m));
        let detected = precise
            .or_else(|| self.probe(request))
            .or_else(|| {
                request
                    .iri
                    .and_then(|iri| self.registry.for_extension(iri))
                    .cloned()
            });

        let mut media_type = match detected {
            Some(media_type) => media_type,
            None => declared.clone().unwrap_or_else(MediaType::octet_stream),
        };

        let explicit = request
            .charset
            .or_else(|| declared.as_ref().and_then(MediaType::charset))
            .map(str::to_string);
        if let Some(charset) = explicit {
            media_type = media_type.with_charset(&charset);
        } else if media_type.charset().is_none() {
            if self.is_yaml(&media_type) {
                let head = self.leading_bytes(request);
                media_type = media_type.with_charset(yaml_charset(&head));
            } else if defaults_to_charset(&media_type) {
                media_type = media_type.with_charset(&self.default_charset);
            }
        }

        trace!(iri = ?request.iri, content_type = ?request.content_type, detected = %media_type, "detected media type");
        media_type
    }

    fn is_yaml(&self, media_type: &MediaType) -> bool {
        media_type.structured_suffix() == Some("yaml")
            || self
                .registry
                .normalized_eq(media_type, &MediaType::new("application", "yaml"))
    }

    /// Signature match on the leading bytes of a local file
    fn probe(&self, request: &DetectionRequest<'_>) -> Option<MediaType> {
        local_path(request.iri?)?;
        let head = self.leading_bytes(request);
        SIGNATURES
            .iter()
            .find(|(signature, _)| head.starts_with(signature))
            .and_then(|(_, media_type)| MediaType::parse(media_type).ok())
    }

    fn leading_bytes(&self, request: &DetectionRequest<'_>) -> Vec<u8> {
        if let Some(bytes) = request.leading_bytes {
            return bytes.iter().take(PROBE_LEN).copied().collect();
        }
        let Some(path) = request.iri.and_then(local_path) else {
            return Vec::new();
        };
        let mut head = Vec::with_capacity(PROBE_LEN);
        match File::open(&path) {
            Ok(file) => {
                if let Err(e) = file.take(PROBE_LEN as u64).read_to_end(&mut head) {
                    trace!(path = %path.display(), error = %e, "could not read leading bytes");
                }
            }
            Err(e) => trace!(path = %path.display(), error = %e, "could not open for probing"),
        }
        head
    }
}

fn listed(list: &[&str], media_type: &MediaType) -> bool {
    let essence = media_type.essence();
    list.contains(&essence.as_str())
}

fn defaults_to_charset(media_type: &MediaType) -> bool {
    media_type.is_text() || media_type.essence() == mt::JSON || media_type.structured_suffix() == Some("json")
}

/// Filesystem path of a `file:` IRI, without query and fragment
pub fn local_path(iri: &str) -> Option<PathBuf> {
    let rest = iri
        .strip_prefix("file:")
        .or_else(|| iri.strip_prefix("FILE:"))?;
    let rest = rest.split(['?', '#']).next().unwrap_or(rest);
    // file:///abs, file://localhost/abs, file:/abs and file:relative
    let path = match rest.strip_prefix("//") {
        Some(authority_and_path) => match authority_and_path.find('/') {
            Some(slash) => &authority_and_path[slash..],
            None => return None,
        },
        None => rest,
    };
    if path.is_empty() {
        return None;
    }
    Some(PathBuf::from(path))
}

/// Encoding of YAML text from its first four bytes
///
/// Follows the YAML 1.2 byte-order-mark table; anything unrecognised, or
/// fewer than four bytes, is UTF-8.
pub fn yaml_charset(head: &[u8]) -> &'static str {
    match head {
        [0x00, 0x00, 0xFE, 0xFF, ..] | [0x00, 0x00, 0x00, _, ..] => "utf-32be",
        [0xFF, 0xFE, 0x00, 0x00, ..] | [_, 0x00, 0x00, 0x00, ..] => "utf-32le",
        [0xFE, 0xFF, _, _, ..] | [0x00, _, _, _, ..] => "utf-16be",
        [0xFF, 0xFE, _, _, ..] | [_, 0x00, _, _, ..] => "utf-16le",
        _ => "utf-8",
    }
}
