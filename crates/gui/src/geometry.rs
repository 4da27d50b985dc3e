//! Geometric analysis of decoded meshes: bounds, dimensions, shading normals.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use shared::{AnalysisError, BoundingBox, Dimensions, IndexedGeometry, Mesh, RawMesh, Triangle, Vec3};

/// Fallback normal for vertices with no usable adjacent face
const FALLBACK_NORMAL: glam::Vec3 = glam::Vec3::Z;

/// How per-vertex normals are derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NormalMode {
    /// Area-weighted average over faces sharing a position
    #[default]
    Smooth,
    /// Each corner takes its own face normal
    Flat,
}

/// Options for [`analyze`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    pub normal_mode: NormalMode,
    /// Build a shared-vertex index buffer (smooth mode only)
    pub build_index: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            normal_mode: NormalMode::Smooth,
            build_index: true,
        }
    }
}

/// Mesh enriched with normals, plus its measurements
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedModel {
    pub mesh: Mesh,
    pub bounds: BoundingBox,
    pub dimensions: Dimensions,
}

/// Run bounding box, normals and (optionally) welding over a raw mesh.
pub fn analyze(raw: RawMesh, options: &AnalysisOptions) -> Result<AnalyzedModel, AnalysisError> {
    let bounds = compute_bounding_box(&raw)?;
    let dimensions = derive_dimensions(&bounds);
    let normals = compute_vertex_normals(&raw, options.normal_mode);

    let indexed = if options.build_index && options.normal_mode == NormalMode::Smooth {
        Some(build_index_buffer(&raw, &normals))
    } else {
        None
    };

    Ok(AnalyzedModel {
        mesh: Mesh {
            raw,
            normals,
            indexed,
        },
        bounds,
        dimensions,
    })
}

/// Componentwise min/max over every vertex position.
pub fn compute_bounding_box(mesh: &RawMesh) -> Result<BoundingBox, AnalysisError> {
    let mut positions = mesh.positions().map(|p| glam::Vec3::from_array(*p));
    let first = positions.next().ok_or(AnalysisError::EmptyMesh)?;
    let (min, max) = positions.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
    Ok(BoundingBox::new(min.to_array(), max.to_array()))
}

/// Width/height/depth of a bounding box
pub fn derive_dimensions(bounds: &BoundingBox) -> Dimensions {
    bounds.dimensions()
}

/// One unit normal per flattened vertex.
///
/// Face contributions are the unnormalized edge cross products, so the sum
/// is area-weighted. Zero-area faces contribute nothing.
pub fn compute_vertex_normals(mesh: &RawMesh, mode: NormalMode) -> Vec<Vec3> {
    let faces: Vec<glam::Vec3> = mesh.triangles.iter().map(face_cross).collect();

    match mode {
        NormalMode::Flat => mesh
            .triangles
            .iter()
            .zip(&faces)
            .flat_map(|(tri, &face)| {
                let n = resolve_normal(face, face, tri).to_array();
                [n, n, n]
            })
            .collect(),
        NormalMode::Smooth => {
            let mut sums: HashMap<PositionKey, glam::Vec3> =
                HashMap::with_capacity(mesh.vertex_count() / 2);
            for (tri, &face) in mesh.triangles.iter().zip(&faces) {
                if !is_usable(face) {
                    continue;
                }
                for v in &tri.vertices {
                    *sums.entry(PositionKey::new(v)).or_insert(glam::Vec3::ZERO) += face;
                }
            }

            let mut normals = Vec::with_capacity(mesh.vertex_count());
            for (tri, &face) in mesh.triangles.iter().zip(&faces) {
                for v in &tri.vertices {
                    let sum = sums
                        .get(&PositionKey::new(v))
                        .copied()
                        .unwrap_or(glam::Vec3::ZERO);
                    normals.push(resolve_normal(sum, face, tri).to_array());
                }
            }
            normals
        }
    }
}

/// Weld bit-identical positions into a shared-vertex index buffer.
///
/// `normals` must have one entry per flattened vertex; the first corner seen
/// at a position supplies that vertex's normal.
pub fn build_index_buffer(mesh: &RawMesh, normals: &[Vec3]) -> IndexedGeometry {
    let mut lookup: HashMap<PositionKey, u32> = HashMap::with_capacity(mesh.vertex_count() / 2);
    let mut geometry = IndexedGeometry {
        positions: Vec::new(),
        normals: Vec::new(),
        indices: Vec::with_capacity(mesh.vertex_count()),
    };

    for (corner, p) in mesh.positions().enumerate() {
        let next = geometry.positions.len() as u32;
        let index = *lookup.entry(PositionKey::new(p)).or_insert_with(|| {
            geometry.positions.push(*p);
            geometry
                .normals
                .push(normals.get(corner).copied().unwrap_or(FALLBACK_NORMAL.to_array()));
            next
        });
        geometry.indices.push(index);
    }

    geometry
}

// ── Helpers ──────────────────────────────────────────────────

/// (b - a) × (c - a); its length is twice the triangle's area
fn face_cross(tri: &Triangle) -> glam::Vec3 {
    let [a, b, c] = tri.vertices.map(glam::Vec3::from_array);
    (b - a).cross(c - a)
}

fn is_usable(face: glam::Vec3) -> bool {
    face.is_finite() && face.length_squared() > 0.0
}

/// First of: accumulated sum, own face, supplied normal, +Z
fn resolve_normal(sum: glam::Vec3, face: glam::Vec3, tri: &Triangle) -> glam::Vec3 {
    let n = sum.normalize_or_zero();
    if n != glam::Vec3::ZERO {
        return n;
    }
    let n = face.normalize_or_zero();
    if n != glam::Vec3::ZERO {
        return n;
    }
    if tri.has_normal() {
        let n = glam::Vec3::from_array(tri.normal).normalize_or_zero();
        if n != glam::Vec3::ZERO {
            return n;
        }
    }
    FALLBACK_NORMAL
}

/// Hashable position; +0.0 and -0.0 map to the same key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PositionKey([u32; 3]);

impl PositionKey {
    fn new(p: &Vec3) -> Self {
        let bits = |v: f32| if v == 0.0 { 0 } else { v.to_bits() };
        Self([bits(p[0]), bits(p[1]), bits(p[2])])
    }
}
