//! Mesh validation utilities.
//!
//! `MeshValidator` checks a decoded mesh for integrity: normal cardinality,
//! unit-length normals, absence of NaN, index range, and bounds containment.

use shared::{BoundingBox, Mesh, Vec3};

/// Validator for `Mesh` integrity checks.
pub struct MeshValidator<'a> {
    mesh: &'a Mesh,
}

impl<'a> MeshValidator<'a> {
    /// Create a new validator for the given mesh.
    pub fn new(mesh: &'a Mesh) -> Self {
        Self { mesh }
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    pub fn triangle_count(&self) -> usize {
        self.mesh.triangle_count()
    }

    /// One normal per flattened vertex
    pub fn normals_match_vertices(&self) -> bool {
        self.mesh.normals.len() == self.mesh.vertex_count()
    }

    /// Check that all vertex normals have unit length (within epsilon).
    pub fn are_normals_normalized(&self, epsilon: f32) -> bool {
        let indexed = self.mesh.indexed.iter().flat_map(|g| g.normals.iter());
        self.mesh
            .normals
            .iter()
            .chain(indexed)
            .all(|n| (length(n) - 1.0).abs() <= epsilon)
    }

    /// True if any normal component is NaN
    pub fn has_nan_normals(&self) -> bool {
        let indexed = self.mesh.indexed.iter().flat_map(|g| g.normals.iter());
        self.mesh
            .normals
            .iter()
            .chain(indexed)
            .any(|n| n.iter().any(|c| c.is_nan()))
    }

    /// Check the index buffer (if any) is whole triangles of in-range indices.
    pub fn are_indices_in_range(&self) -> bool {
        match &self.mesh.indexed {
            None => true,
            Some(g) => {
                let max = g.positions.len() as u32;
                g.indices.len() == self.mesh.vertex_count()
                    && g.normals.len() == g.positions.len()
                    && g.indices.iter().all(|&i| i < max)
            }
        }
    }

    /// Every vertex lies inside `bounds`.
    pub fn is_contained_in(&self, bounds: &BoundingBox) -> bool {
        self.mesh.raw.positions().all(|p| bounds.contains(p))
    }

    /// Run all checks, returning a list of failures (empty = all pass).
    pub fn validate_all(&self, bounds: &BoundingBox) -> Vec<String> {
        let mut errors = Vec::new();
        if !self.normals_match_vertices() {
            errors.push(format!(
                "{} normals for {} vertices",
                self.mesh.normals.len(),
                self.vertex_count()
            ));
        }
        if self.has_nan_normals() {
            errors.push("NaN in vertex normals".to_string());
        }
        if !self.are_normals_normalized(1e-4) {
            errors.push("Some normals are not unit length".to_string());
        }
        if !self.are_indices_in_range() {
            errors.push("Index buffer is inconsistent".to_string());
        }
        if !self.is_contained_in(bounds) {
            errors.push("Vertex outside bounding box".to_string());
        }
        errors
    }
}

fn length(v: &Vec3) -> f32 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}
