//! Readable and writable resources
//!
//! A resource is an IRI, a media type and bytes. Conversion reads from one
//! [`ReadableResource`] and writes to one [`WritableResource`]; both traits
//! take `&self` so resources can be handed around as trait objects.

use std::fmt;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use thingraph_media::{DetectionRequest, MediaType, MediaTypeDetector};

use crate::error::{ConversionError, Result};
use crate::text;

pub trait Resource {
    fn iri(&self) -> &str;

    fn media_type(&self) -> &MediaType;
}

pub trait ReadableResource: Resource {
    fn read_bytes(&self) -> Result<Vec<u8>>;

    /// Content decoded with the media type's charset, UTF-8 when absent
    fn read_text(&self) -> Result<String> {
        let bytes = self.read_bytes()?;
        text::decode(self.iri(), &bytes, self.media_type().charset())
    }
}

pub trait WritableResource: Resource {
    /// Replace the content
    fn write_bytes(&self, bytes: &[u8]) -> Result<()>;

    /// Encode with the media type's charset, UTF-8 when absent
    fn write_text(&self, text: &str) -> Result<()> {
        let bytes = text::encode(self.iri(), text, self.media_type().charset())?;
        self.write_bytes(&bytes)
    }
}

/// `iri (media type)`, as used in error messages
pub(crate) fn describe<R: Resource + ?Sized>(resource: &R) -> String {
    format!("{} ({})", resource.iri(), resource.media_type())
}

/// In-memory bytes, readable and writable
pub struct MemoryResource {
    iri: String,
    media_type: MediaType,
    bytes: RwLock<Vec<u8>>,
}

impl MemoryResource {
    pub fn new(iri: impl Into<String>, media_type: MediaType) -> Self {
        Self::with_bytes(iri, media_type, Vec::new())
    }

    pub fn with_bytes(iri: impl Into<String>, media_type: MediaType, bytes: Vec<u8>) -> Self {
        Self {
            iri: iri.into(),
            media_type,
            bytes: RwLock::new(bytes),
        }
    }

    /// Snapshot of the current content
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.read().clone()
    }

    pub fn text(&self) -> Result<String> {
        self.read_text()
    }
}

impl fmt::Debug for MemoryResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryResource")
            .field("iri", &self.iri)
            .field("media_type", &self.media_type.to_string())
            .field("len", &self.bytes.read().len())
            .finish()
    }
}

impl Resource for MemoryResource {
    fn iri(&self) -> &str {
        &self.iri
    }

    fn media_type(&self) -> &MediaType {
        &self.media_type
    }
}

impl ReadableResource for MemoryResource {
    fn read_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.bytes())
    }
}

impl WritableResource for MemoryResource {
    fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        *self.bytes.write() = bytes.to_vec();
        Ok(())
    }
}

/// Read-only text
#[derive(Debug, Clone)]
pub struct StringResource {
    iri: String,
    media_type: MediaType,
    text: String,
}

impl StringResource {
    /// The media type gets `charset=utf-8` unless it names one
    pub fn new(iri: impl Into<String>, media_type: MediaType, text: impl Into<String>) -> Self {
        let media_type = match media_type.charset() {
            Some(_) => media_type,
            None => media_type.with_charset("utf-8"),
        };
        Self {
            iri: iri.into(),
            media_type,
            text: text.into(),
        }
    }
}

impl Resource for StringResource {
    fn iri(&self) -> &str {
        &self.iri
    }

    fn media_type(&self) -> &MediaType {
        &self.media_type
    }
}

impl ReadableResource for StringResource {
    fn read_bytes(&self) -> Result<Vec<u8>> {
        text::encode(&self.iri, &self.text, self.media_type.charset())
    }

    fn read_text(&self) -> Result<String> {
        Ok(self.text.clone())
    }
}

/// A local file
#[derive(Debug, Clone)]
pub struct FileResource {
    iri: String,
    path: PathBuf,
    media_type: MediaType,
}

impl FileResource {
    pub fn new(path: impl AsRef<Path>, media_type: MediaType) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            iri: file_iri(&path),
            path,
            media_type,
        }
    }

    /// Media type detected from the file's extension and leading bytes
    pub fn detect(path: impl AsRef<Path>, detector: &MediaTypeDetector<'_>) -> Self {
        let path = path.as_ref().to_path_buf();
        let iri = file_iri(&path);
        let media_type = detector.detect(&DetectionRequest::new(&iri));
        Self {
            iri,
            path,
            media_type,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> ConversionError {
        ConversionError::Io {
            iri: self.iri.clone(),
            source,
        }
    }
}

fn file_iri(path: &Path) -> String {
    let text = path.to_string_lossy().replace('\\', "/");
    if text.starts_with('/') {
        format!("file://{}", text)
    } else {
        format!("file:{}", text)
    }
}

impl Resource for FileResource {
    fn iri(&self) -> &str {
        &self.iri
    }

    fn media_type(&self) -> &MediaType {
        &self.media_type
    }
}

impl ReadableResource for FileResource {
    fn read_bytes(&self) -> Result<Vec<u8>> {
        std::fs::read(&self.path).map_err(|e| self.io_error(e))
    }
}

impl WritableResource for FileResource {
    fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        std::fs::write(&self.path, bytes).map_err(|e| self.io_error(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_resource_round_trip() {
        let r = MemoryResource::new("memory:a", MediaType::new("text", "plain").with_charset("utf-16le"));
        r.write_text("hé").unwrap();
        assert_eq!(r.bytes(), vec![b'h', 0x00, 0xE9, 0x00]);
        assert_eq!(r.read_text().unwrap(), "hé");
    }

    #[test]
    fn test_string_resource_defaults_to_utf8() {
        let r = StringResource::new("string:a", MediaType::new("text", "turtle"), "é");
        assert_eq!(r.media_type().charset(), Some("utf-8"));
        assert_eq!(r.read_bytes().unwrap(), "é".as_bytes());
    }

    #[test]
    fn test_file_iri() {
        assert_eq!(file_iri(Path::new("/tmp/a.ttl")), "file:///tmp/a.ttl");
        assert_eq!(file_iri(Path::new("a.ttl")), "file:a.ttl");
    }
}
