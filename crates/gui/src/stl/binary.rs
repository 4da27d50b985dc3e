//! Binary STL records.
//!
//! Layout:
//! - 80-byte header (ignored)
//! - u32 triangle count (little-endian)
//! - For each triangle: 3×f32 normal + 3×(3×f32 vertex) + u16 attribute = 50 bytes

use shared::{ParseError, RawMesh, Triangle, Vec3};

pub const BINARY_HEADER_LEN: usize = 80;
pub const BINARY_RECORD_LEN: usize = 50;

const DATA_START: usize = BINARY_HEADER_LEN + 4;

/// Decode a binary STL stream.
///
/// Trailing bytes past the declared records are ignored here; length
/// discrimination happens in [`super::parse`].
pub fn parse_binary(bytes: &[u8]) -> Result<RawMesh, ParseError> {
    let declared = super::declared_triangle_count(bytes).ok_or(ParseError::UnsupportedFormat)?;
    if declared == 0 {
        return Err(ParseError::EmptyMesh);
    }

    let body = &bytes[DATA_START..];
    let available = body.len() / BINARY_RECORD_LEN;
    if available < declared as usize {
        return Err(ParseError::TruncatedBinary {
            declared,
            available,
        });
    }

    let triangles = body
        .chunks_exact(BINARY_RECORD_LEN)
        .take(declared as usize)
        .map(read_record)
        .collect();

    Ok(RawMesh::new(triangles))
}

fn read_record(record: &[u8]) -> Triangle {
    // Bytes 48..50 are the attribute byte count, unused
    Triangle {
        normal: read_vec3(&record[0..12]),
        vertices: [
            read_vec3(&record[12..24]),
            read_vec3(&record[24..36]),
            read_vec3(&record[36..48]),
        ],
    }
}

fn read_vec3(buf: &[u8]) -> Vec3 {
    [read_f32(&buf[0..4]), read_f32(&buf[4..8]), read_f32(&buf[8..12])]
}

fn read_f32(buf: &[u8]) -> f32 {
    f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]])
}
