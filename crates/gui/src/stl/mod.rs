//! STL decoding.
//!
//! Format discrimination follows the binary length rule: a stream whose
//! length is exactly `84 + 50 * N` (with `N` read from bytes 80..84) is
//! binary. Anything else is tried as text if it looks like text, reported as
//! a truncated binary if it is shorter than its declared length, and
//! rejected otherwise.

mod ascii;
mod binary;

use shared::{ParseError, RawMesh, StlFormat};

pub use ascii::parse_ascii;
pub use binary::{parse_binary, BINARY_HEADER_LEN, BINARY_RECORD_LEN};

/// How many leading bytes are inspected when sniffing for text
const TEXT_SNIFF_LEN: usize = 1024;

/// Decoded STL stream
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStl {
    pub mesh: RawMesh,
    pub format: StlFormat,
}

/// Decode an STL byte stream into a raw triangle mesh.
pub fn parse(bytes: &[u8]) -> Result<ParsedStl, ParseError> {
    let declared = declared_triangle_count(bytes);

    if let Some(n) = declared {
        if bytes.len() as u64 == expected_binary_len(n) {
            let mesh = parse_binary(bytes)?;
            return Ok(ParsedStl {
                mesh,
                format: StlFormat::Binary,
            });
        }
    }

    if looks_like_text(bytes) {
        let mesh = parse_ascii(bytes)?;
        return Ok(ParsedStl {
            mesh,
            format: StlFormat::Ascii,
        });
    }

    match declared {
        Some(n) if (bytes.len() as u64) < expected_binary_len(n) => {
            // Goes through the binary decoder so the error reports what is present
            parse_binary(bytes).map(|mesh| ParsedStl {
                mesh,
                format: StlFormat::Binary,
            })
        }
        _ => Err(ParseError::UnsupportedFormat),
    }
}

/// Triangle count from the binary header, if the stream is long enough to have one
pub fn declared_triangle_count(bytes: &[u8]) -> Option<u32> {
    let count = bytes.get(BINARY_HEADER_LEN..BINARY_HEADER_LEN + 4)?;
    Some(u32::from_le_bytes([count[0], count[1], count[2], count[3]]))
}

/// Exact byte length of a binary STL with `n` triangles
pub fn expected_binary_len(n: u32) -> u64 {
    (BINARY_HEADER_LEN as u64 + 4) + BINARY_RECORD_LEN as u64 * n as u64
}

/// UTF-8 byte order mark some exporters put before `solid`
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Text candidates start with `solid` (after an optional BOM and whitespace)
/// and carry no NUL bytes near the start.
fn looks_like_text(bytes: &[u8]) -> bool {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let sniff = &bytes[..bytes.len().min(TEXT_SNIFF_LEN)];
    if sniff.contains(&0) {
        return false;
    }
    let start = sniff
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(sniff.len());
    sniff[start..]
        .get(..5)
        .is_some_and(|kw| kw.eq_ignore_ascii_case(b"solid"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_binary_len() {
        assert_eq!(expected_binary_len(0), 84);
        assert_eq!(expected_binary_len(3), 234);
        assert_eq!(expected_binary_len(u32::MAX), 84 + 50 * u32::MAX as u64);
    }

    #[test]
    fn test_declared_count_needs_full_header() {
        assert_eq!(declared_triangle_count(&[0u8; 83]), None);
        let mut bytes = vec![0u8; 84];
        bytes[80..84].copy_from_slice(&7u32.to_le_bytes());
        assert_eq!(declared_triangle_count(&bytes), Some(7));
    }

    #[test]
    fn test_text_sniffing() {
        assert!(looks_like_text(b"  \n SOLID cube\nfacet normal"));
        assert!(!looks_like_text(b"solid\0\0\0"));
        assert!(!looks_like_text(b"sol"));
        assert!(!looks_like_text(b"ply\nformat ascii"));
        assert!(looks_like_text(b"\xEF\xBB\xBFsolid part\n"));
    }

    #[test]
    fn test_short_garbage_is_unsupported() {
        assert_eq!(parse(b"hello"), Err(ParseError::UnsupportedFormat));
        assert_eq!(parse(&[]), Err(ParseError::UnsupportedFormat));
    }
}
