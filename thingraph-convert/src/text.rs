//! Charset decoding and encoding of text resources
//!
//! UTF-8 (the default), UTF-16 in both byte orders, US-ASCII and ISO-8859-1
//! are handled. A leading byte-order mark is dropped when decoding.

use crate::error::{ConversionError, Result};

pub fn decode(iri: &str, bytes: &[u8], charset: Option<&str>) -> Result<String> {
    let charset = charset.unwrap_or("utf-8").to_ascii_lowercase();
    let unsupported = || ConversionError::Charset {
        iri: iri.to_string(),
        charset: charset.clone(),
    };
    match charset.as_str() {
        "utf-8" | "utf8" => {
            let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
            String::from_utf8(bytes.to_vec()).map_err(|_| unsupported())
        }
        "utf-16le" | "utf-16be" | "utf-16" => {
            if bytes.len() % 2 != 0 {
                return Err(unsupported());
            }
            let little = match charset.as_str() {
                "utf-16le" => true,
                "utf-16be" => false,
                _ => bytes.starts_with(b"\xFF\xFE"),
            };
            let units = bytes.chunks_exact(2).map(|pair| {
                if little {
                    u16::from_le_bytes([pair[0], pair[1]])
                } else {
                    u16::from_be_bytes([pair[0], pair[1]])
                }
            });
            let text: String = char::decode_utf16(units)
                .collect::<std::result::Result<_, _>>()
                .map_err(|_| unsupported())?;
            Ok(text.strip_prefix('\u{FEFF}').map(str::to_string).unwrap_or(text))
        }
        "us-ascii" | "ascii" => {
            if bytes.is_ascii() {
                Ok(bytes.iter().map(|&b| b as char).collect())
            } else {
                Err(unsupported())
            }
        }
        "iso-8859-1" | "latin1" => Ok(bytes.iter().map(|&b| b as char).collect()),
        _ => Err(unsupported()),
    }
}

pub fn encode(iri: &str, text: &str, charset: Option<&str>) -> Result<Vec<u8>> {
    let charset = charset.unwrap_or("utf-8").to_ascii_lowercase();
    let unsupported = || ConversionError::Charset {
        iri: iri.to_string(),
        charset: charset.clone(),
    };
    match charset.as_str() {
        "utf-8" | "utf8" => Ok(text.as_bytes().to_vec()),
        "utf-16le" => Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect()),
        "utf-16be" | "utf-16" => Ok(text.encode_utf16().flat_map(u16::to_be_bytes).collect()),
        "us-ascii" | "ascii" if text.is_ascii() => Ok(text.as_bytes().to_vec()),
        "iso-8859-1" | "latin1" => text
            .chars()
            .map(|c| u8::try_from(u32::from(c)).map_err(|_| unsupported()))
            .collect(),
        _ => Err(unsupported()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_bom_is_dropped() {
        assert_eq!(decode("x", b"\xEF\xBB\xBFa: 1", None).unwrap(), "a: 1");
    }

    #[test]
    fn test_utf16() {
        let le = encode("x", "héllo", Some("UTF-16LE")).unwrap();
        assert_eq!(decode("x", &le, Some("utf-16le")).unwrap(), "héllo");
        let be = [0xFE, 0xFF, 0x00, b'a'];
        assert_eq!(decode("x", &be, Some("utf-16be")).unwrap(), "a");
        assert_eq!(decode("x", &[0xFF, 0xFE, b'a', 0x00], Some("utf-16")).unwrap(), "a");
    }

    #[test]
    fn test_latin1_and_ascii() {
        assert_eq!(decode("x", &[0x63, 0x61, 0x66, 0xE9], Some("iso-8859-1")).unwrap(), "café");
        assert_eq!(encode("x", "café", Some("latin1")).unwrap(), vec![0x63, 0x61, 0x66, 0xE9]);
        assert!(decode("x", &[0xE9], Some("us-ascii")).is_err());
        assert!(encode("x", "€", Some("iso-8859-1")).is_err());
    }

    #[test]
    fn test_unsupported() {
        let err = decode("file:///a.yaml", b"abcd", Some("utf-32le")).unwrap_err();
        assert!(matches!(err, ConversionError::Charset { ref charset, .. } if charset == "utf-32le"));
        assert!(decode("x", &[0xC3], None).is_err());
    }
}
