//! Factory functions for test data: triangle sets and encoded STL bytes.

use shared::{Triangle, Vec3};

// ── Triangle factories ──────────────────────────────────────────

/// Right triangle in the XY plane with its normal set to +Z.
pub fn unit_triangle() -> Triangle {
    Triangle::new(
        [0.0, 0.0, 1.0],
        [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
    )
}

/// Closed axis-aligned box: 12 outward-facing triangles with normals set.
pub fn box_triangles(min: Vec3, max: Vec3) -> Vec<Triangle> {
    let [x0, y0, z0] = min;
    let [x1, y1, z1] = max;
    let mut tris = Vec::with_capacity(12);
    // -Z / +Z
    quad(&mut tris, [x0, y0, z0], [x0, y1, z0], [x1, y1, z0], [x1, y0, z0], [0.0, 0.0, -1.0]);
    quad(&mut tris, [x0, y0, z1], [x1, y0, z1], [x1, y1, z1], [x0, y1, z1], [0.0, 0.0, 1.0]);
    // -Y / +Y
    quad(&mut tris, [x0, y0, z0], [x1, y0, z0], [x1, y0, z1], [x0, y0, z1], [0.0, -1.0, 0.0]);
    quad(&mut tris, [x0, y1, z0], [x0, y1, z1], [x1, y1, z1], [x1, y1, z0], [0.0, 1.0, 0.0]);
    // -X / +X
    quad(&mut tris, [x0, y0, z0], [x0, y0, z1], [x0, y1, z1], [x0, y1, z0], [-1.0, 0.0, 0.0]);
    quad(&mut tris, [x1, y0, z0], [x1, y1, z0], [x1, y1, z1], [x1, y0, z1], [1.0, 0.0, 0.0]);
    tris
}

/// Box with one extra zero-area triangle (collinear corners, no normal).
pub fn box_with_degenerate(min: Vec3, max: Vec3) -> Vec<Triangle> {
    let mut tris = box_triangles(min, max);
    tris.push(Triangle::from_vertices(min, max, min));
    tris
}

fn quad(out: &mut Vec<Triangle>, a: Vec3, b: Vec3, c: Vec3, d: Vec3, normal: Vec3) {
    out.push(Triangle::new(normal, [a, b, c]));
    out.push(Triangle::new(normal, [a, c, d]));
}

// ── STL encoders ────────────────────────────────────────────────

/// Binary STL with an accurate triangle count.
pub fn binary_stl(triangles: &[Triangle]) -> Vec<u8> {
    binary_stl_with_header(b"binary STL fixture", triangles)
}

/// Binary STL whose 80-byte header starts with `header` (zero padded).
pub fn binary_stl_with_header(header: &[u8], triangles: &[Triangle]) -> Vec<u8> {
    let mut out = Vec::with_capacity(84 + 50 * triangles.len());
    let mut head = [0u8; 80];
    let len = header.len().min(80);
    head[..len].copy_from_slice(&header[..len]);
    out.extend_from_slice(&head);
    out.extend_from_slice(&(triangles.len() as u32).to_le_bytes());
    for tri in triangles {
        push_record(&mut out, tri);
    }
    out
}

/// Binary STL declaring `declared` triangles but carrying only `triangles`.
pub fn binary_stl_with_count(triangles: &[Triangle], declared: u32) -> Vec<u8> {
    let mut out = binary_stl(triangles);
    out[80..84].copy_from_slice(&declared.to_le_bytes());
    out
}

fn push_record(out: &mut Vec<u8>, tri: &Triangle) {
    for v in std::iter::once(&tri.normal).chain(tri.vertices.iter()) {
        for c in v {
            out.extend_from_slice(&c.to_le_bytes());
        }
    }
    out.extend_from_slice(&0u16.to_le_bytes());
}

/// Text STL for one solid named `name`.
///
/// Floats use Rust's shortest round-trip formatting, so parsing the text
/// gives back the exact same values.
pub fn ascii_stl(name: &str, triangles: &[Triangle]) -> String {
    let mut out = format!("solid {}\n", name);
    for tri in triangles {
        let [nx, ny, nz] = tri.normal;
        out.push_str(&format!("  facet normal {} {} {}\n", nx, ny, nz));
        out.push_str("    outer loop\n");
        for [x, y, z] in tri.vertices {
            out.push_str(&format!("      vertex {} {} {}\n", x, y, z));
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    }
    out.push_str(&format!("endsolid {}\n", name));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_has_outward_normals() {
        for tri in box_triangles([0.0; 3], [2.0, 3.0, 4.0]) {
            let [a, b, c] = tri.vertices.map(glam::Vec3::from_array);
            let cross = (b - a).cross(c - a).normalize();
            assert!(cross.abs_diff_eq(glam::Vec3::from_array(tri.normal), 1e-6));
        }
    }

    #[test]
    fn test_binary_length() {
        let bytes = binary_stl(&box_triangles([0.0; 3], [1.0; 3]));
        assert_eq!(bytes.len(), 84 + 50 * 12);
    }
}
