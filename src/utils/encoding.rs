//! Encoding detection and tolerant text decoding.
//!
//! Decoding strategy:
//! - BOM markers (UTF-8, UTF-16 LE/BE) win outright
//! - Strict UTF-8 fast path for the common case
//! - chardetng guess for everything else, decoded with replacement characters
//!
//! Binary content is reported separately so callers can treat it as absent
//! instead of pushing replacement-character soup into a prompt.

use anyhow::{Context, Result};
use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use std::path::Path;

const SAMPLE_SIZE: usize = 8192;
const MIN_PRINTABLE_RATIO: f64 = 0.70;

/// Detect if a byte buffer is binary (not text).
///
/// Heuristics, on the first 8 KiB:
/// 1. A BOM means text, even for UTF-16 with its embedded null bytes
/// 2. Any null byte means binary
/// 3. Valid UTF-8 (tolerating a sequence cut at the sample edge) means text
/// 4. Otherwise fewer than 70% printable bytes means binary
pub fn looks_binary(bytes: &[u8]) -> bool {
    let sample = &bytes[..bytes.len().min(SAMPLE_SIZE)];
    if sample.is_empty() || Encoding::for_bom(sample).is_some() {
        return false;
    }
    if sample.contains(&0) {
        return true;
    }
    match std::str::from_utf8(sample) {
        Ok(_) => return false,
        Err(e) if e.error_len().is_none() => return false,
        Err(_) => {}
    }

    // printable ASCII, tab, LF, CR, and the Latin-1 letter range
    let printable = sample
        .iter()
        .filter(|&&b| (32..=126).contains(&b) || b == 9 || b == 10 || b == 13 || b >= 0xa0)
        .count();
    (printable as f64 / sample.len() as f64) < MIN_PRINTABLE_RATIO
}

fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }
    if std::str::from_utf8(bytes).is_ok() {
        return UTF_8;
    }
    let mut detector = EncodingDetector::new();
    detector.feed(&bytes[..bytes.len().min(SAMPLE_SIZE)], bytes.len() <= SAMPLE_SIZE);
    detector.guess(None, true)
}

/// Decode bytes to text, substituting undecodable sequences.
///
/// Returns the text and the name of the encoding that was used.
pub fn decode_bytes(bytes: &[u8]) -> (String, &'static str) {
    let encoding = detect_encoding(bytes);
    // `decode` strips a BOM and may switch encoding when one is present.
    let (decoded, used, _had_errors) = encoding.decode(bytes);
    (decoded.into_owned(), used.name())
}

/// Read a file as text.
///
/// `Ok(None)` means the file is binary; I/O failures are errors.
pub fn read_text_file(path: &Path) -> Result<Option<String>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    if looks_binary(&bytes) {
        return Ok(None);
    }
    let (text, encoding) = decode_bytes(&bytes);
    if encoding != UTF_8.name() {
        tracing::debug!("Decoded {} as {}", path.display(), encoding);
    }
    Ok(Some(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_plain_utf8_is_text() {
        assert!(!looks_binary("Test content 🚀\n".as_bytes()));
        assert!(!looks_binary("日本語のテキスト".as_bytes()));
        assert!(!looks_binary(b""));
    }

    #[test]
    fn test_null_byte_is_binary() {
        assert!(looks_binary(&[0x00, 0x01, 0x02]));
    }

    #[test]
    fn test_invalid_high_bytes_are_binary() {
        let bytes: Vec<u8> = (0x80..0xa0).collect();
        assert!(looks_binary(&bytes));
    }

    #[test]
    fn test_utf16_with_bom_is_text() {
        let mut bytes = vec![0xff, 0xfe];
        for unit in "hi".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        assert!(!looks_binary(&bytes));
        let (text, _) = decode_bytes(&bytes);
        assert_eq!(text, "hi");
    }

    #[test]
    fn test_decode_strips_utf8_bom() {
        let (text, encoding) = decode_bytes(&[0xef, 0xbb, 0xbf, b'o', b'k']);
        assert_eq!(text, "ok");
        assert_eq!(encoding, "UTF-8");
    }

    #[test]
    fn test_latin1_noise_is_tolerated() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"caf\xe9 au lait, na\xefve r\xe9sum\xe9\n").unwrap();
        file.flush().unwrap();

        let text = read_text_file(file.path()).unwrap().expect("text");
        assert!(text.starts_with("caf"));
        assert!(text.contains("au lait"));
    }

    #[test]
    fn test_read_missing_file_is_error() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(read_text_file(&dir.path().join("missing.txt")).is_err());
    }
}
