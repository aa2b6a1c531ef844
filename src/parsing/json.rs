use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use thiserror::Error;

use crate::core::value::StructuredValue;
use crate::utils::validation::is_gzip;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Input is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("Decoded input exceeds {0} bytes")]
    TooLarge(usize),
}

impl ParseError {
    /// 1-based line and column of a JSON syntax or type error
    #[must_use]
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            Self::InvalidJson(e) => Some((e.line(), e.column())),
            _ => None,
        }
    }
}

/// Parse a document that must hold a JSON array at the top level.
///
/// Elements may be any JSON value, not only objects.
///
/// # Errors
///
/// Returns `ParseError::InvalidJson` if the text is not valid JSON or its
/// top-level value is not an array (including `null`).
pub fn parse(text: &str) -> Result<Vec<StructuredValue>, ParseError> {
    Ok(serde_json::from_str(text)?)
}

/// Read a document from disk into text, decompressing `.gz` files
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read or decompressed, or
/// `ParseError::InvalidUtf8` if the content is not UTF-8.
pub fn read_document(path: &Path) -> Result<String, ParseError> {
    let bytes = if is_gzipped(path) {
        let mut decoded = Vec::new();
        GzDecoder::new(std::fs::File::open(path)?).read_to_end(&mut decoded)?;
        decoded
    } else {
        std::fs::read(path)?
    };

    Ok(strip_bom(String::from_utf8(bytes)?))
}

/// Read and parse a document from disk
///
/// # Errors
///
/// See [`read_document`] and [`parse`].
pub fn load_file(path: &Path) -> Result<Vec<StructuredValue>, ParseError> {
    parse(&read_document(path)?)
}

/// Turn uploaded bytes into text, decompressing gzip content when detected
///
/// Decompression stops once `max_len` bytes are exceeded.
///
/// # Errors
///
/// Returns `ParseError::Io` if gzip content cannot be decompressed,
/// `ParseError::TooLarge` if the decoded content exceeds `max_len`, or
/// `ParseError::InvalidUtf8` if the content is not UTF-8.
pub fn decode_upload(bytes: &[u8], max_len: usize) -> Result<String, ParseError> {
    let decoded = if is_gzip(bytes) {
        let mut decoded = Vec::new();
        let limit = u64::try_from(max_len).unwrap_or(u64::MAX).saturating_add(1);
        GzDecoder::new(bytes).take(limit).read_to_end(&mut decoded)?;
        decoded
    } else {
        bytes.to_vec()
    };

    if decoded.len() > max_len {
        return Err(ParseError::TooLarge(max_len));
    }

    Ok(strip_bom(String::from_utf8(decoded)?))
}

fn is_gzipped(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

fn strip_bom(text: String) -> String {
    match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn gzip(bytes: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(bytes).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_parse_array_of_objects() {
        let records = parse(r#"[{"id": 1}, {"id": 2, "name": "b"}]"#).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get("name").unwrap().rendered(), "b");
    }

    #[test]
    fn test_parse_accepts_non_object_elements() {
        let records = parse(r#"[1, "two", null, [3]]"#).unwrap();
        assert_eq!(records.len(), 4);
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(parse("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_non_array_top_level() {
        for text in [r#"{"id": 1}"#, "null", "42", r#""text""#] {
            let err = parse(text).unwrap_err();
            assert!(matches!(err, ParseError::InvalidJson(_)), "{text}");
        }
    }

    #[test]
    fn test_parse_reports_position_for_truncated_input() {
        let err = parse("[{\"id\": 1},\n {\"id\": ").unwrap_err();
        let (line, _column) = err.position().unwrap();
        assert_eq!(line, 2);
    }

    #[test]
    fn test_decode_upload_plain_and_gzip() {
        let text = r#"[{"id": 1}]"#;
        assert_eq!(decode_upload(text.as_bytes(), 1024).unwrap(), text);
        assert_eq!(decode_upload(&gzip(text.as_bytes()), 1024).unwrap(), text);
    }

    #[test]
    fn test_decode_upload_enforces_limit() {
        let big = vec![b' '; 10_000];
        let err = decode_upload(&gzip(&big), 1_000).unwrap_err();
        assert!(matches!(err, ParseError::TooLarge(1_000)));

        let err = decode_upload(&big, 1_000).unwrap_err();
        assert!(matches!(err, ParseError::TooLarge(1_000)));
    }

    #[test]
    fn test_decode_upload_strips_bom() {
        let bytes = b"\xef\xbb\xbf[]";
        assert_eq!(decode_upload(bytes, 1024).unwrap(), "[]");
    }

    #[test]
    fn test_decode_upload_rejects_invalid_utf8() {
        let err = decode_upload(&[b'[', 0xff, 0xfe, b']'], 1024).unwrap_err();
        assert!(matches!(err, ParseError::InvalidUtf8(_)));
    }

    #[test]
    fn test_load_file_plain_and_gzip() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("records.json");
        let gzipped = dir.path().join("records.json.gz");
        std::fs::write(&plain, r#"[{"id": 1}]"#).unwrap();
        std::fs::write(&gzipped, gzip(br#"[{"id": 1}, {"id": 2}]"#)).unwrap();

        assert_eq!(load_file(&plain).unwrap().len(), 1);
        assert_eq!(load_file(&gzipped).unwrap().len(), 2);
    }

    #[test]
    fn test_load_file_missing() {
        let err = load_file(Path::new("/nonexistent/records.json")).unwrap_err();
        assert!(matches!(err, ParseError::Io(_)));
    }
}
