use std::io::Write;

use thingraph_media::{DetectionRequest, MediaType, MediaTypeDetector, MediaTypeRegistry};

fn file_iri(path: &std::path::Path) -> String {
    format!("file://{}", path.display())
}

#[test]
fn local_file_signature_beats_extension() {
    let registry = MediaTypeRegistry::standard().unwrap();
    let detector = MediaTypeDetector::new(&registry);

    let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    file.write_all(b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR").unwrap();
    let iri = file_iri(file.path());

    assert_eq!(detector.detect(&DetectionRequest::new(&iri)).essence(), "image/png");
}

#[test]
fn local_yaml_file_gets_charset_from_bom() {
    let registry = MediaTypeRegistry::standard().unwrap();
    let detector = MediaTypeDetector::new(&registry);

    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(&[0xFE, 0xFF, 0x00, b'a', 0x00, b':']).unwrap();
    let iri = file_iri(file.path());

    assert_eq!(
        detector.detect(&DetectionRequest::new(&iri)).to_string(),
        "application/yaml; charset=utf-16be"
    );
}

#[test]
fn missing_local_file_falls_back_without_error() {
    let registry = MediaTypeRegistry::standard().unwrap();
    let detector = MediaTypeDetector::new(&registry);
    let dir = tempfile::tempdir().unwrap();

    let unknown = file_iri(&dir.path().join("missing.unknownext"));
    assert_eq!(detector.detect(&DetectionRequest::new(&unknown)), MediaType::octet_stream());

    let turtle = file_iri(&dir.path().join("missing.ttl"));
    assert_eq!(detector.detect(&DetectionRequest::new(&turtle)).essence(), "text/turtle");
}
