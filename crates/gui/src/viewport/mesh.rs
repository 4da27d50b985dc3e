use glam::Vec3;
use shared::Mesh;

/// CPU-side mesh data: interleaved [pos.x, pos.y, pos.z, norm.x, norm.y, norm.z, r, g, b]
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    /// 9 floats per vertex: position(3) + normal(3) + color(3)
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 9
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleave a mesh for upload, translated by `offset`.
    ///
    /// Uses the welded index buffer when the mesh has one, otherwise emits
    /// the flattened triangle list with sequential indices.
    pub fn from_mesh(mesh: &Mesh, offset: Vec3, color: [f32; 3]) -> Self {
        match &mesh.indexed {
            Some(geometry) => {
                let mut vertices = Vec::with_capacity(geometry.positions.len() * 9);
                for (p, n) in geometry.positions.iter().zip(&geometry.normals) {
                    let p = Vec3::from_array(*p) + offset;
                    push_vert(&mut vertices, p, Vec3::from_array(*n), color);
                }
                Self {
                    vertices,
                    indices: geometry.indices.clone(),
                }
            }
            None => {
                let mut vertices = Vec::with_capacity(mesh.vertex_count() * 9);
                for (p, n) in mesh.raw.positions().zip(&mesh.normals) {
                    let p = Vec3::from_array(*p) + offset;
                    push_vert(&mut vertices, p, Vec3::from_array(*n), color);
                }
                let indices = (0..(vertices.len() / 9) as u32).collect();
                Self { vertices, indices }
            }
        }
    }
}

/// Lines mesh: interleaved [pos.x, pos.y, pos.z, r, g, b, a]
#[derive(Clone, Debug, Default)]
pub struct LineMeshData {
    /// 7 floats per vertex: position(3) + color(4)
    pub vertices: Vec<f32>,
}

impl LineMeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 7
    }
}

// ── Grid and axes ────────────────────────────────────────────

/// Square grid in the XZ plane at height `y`
pub fn grid(range: i32, cell_size: f32, opacity: f32, y: f32) -> LineMeshData {
    let mut vertices = Vec::new();
    let grid_color = [0.25_f32, 0.25, 0.25, opacity];
    let origin_color_x = [0.5_f32, 0.2, 0.2, opacity * 0.7];
    let origin_color_z = [0.2_f32, 0.2, 0.5, opacity * 0.7];

    let extent = range as f32 * cell_size;

    for i in -range..=range {
        let f = i as f32 * cell_size;
        let color = if i == 0 { origin_color_z } else { grid_color };
        // Line along Z
        push_line_vert(&mut vertices, f, y, -extent, color);
        push_line_vert(&mut vertices, f, y, extent, color);

        let color = if i == 0 { origin_color_x } else { grid_color };
        // Line along X
        push_line_vert(&mut vertices, -extent, y, f, color);
        push_line_vert(&mut vertices, extent, y, f, color);
    }

    LineMeshData { vertices }
}

pub fn axes(length: f32) -> LineMeshData {
    let mut vertices = Vec::new();
    let r = [0.9_f32, 0.2, 0.2, 1.0];
    let g = [0.2_f32, 0.8, 0.2, 1.0];
    let b = [0.2_f32, 0.3, 0.9, 1.0];

    // X axis
    push_line_vert(&mut vertices, 0.0, 0.0, 0.0, r);
    push_line_vert(&mut vertices, length, 0.0, 0.0, r);
    // Y axis
    push_line_vert(&mut vertices, 0.0, 0.0, 0.0, g);
    push_line_vert(&mut vertices, 0.0, length, 0.0, g);
    // Z axis
    push_line_vert(&mut vertices, 0.0, 0.0, 0.0, b);
    push_line_vert(&mut vertices, 0.0, 0.0, length, b);

    LineMeshData { vertices }
}

// ── Helpers ──────────────────────────────────────────────────

fn push_vert(v: &mut Vec<f32>, p: Vec3, n: Vec3, c: [f32; 3]) {
    v.extend_from_slice(&[p.x, p.y, p.z, n.x, n.y, n.z, c[0], c[1], c[2]]);
}

fn push_line_vert(v: &mut Vec<f32>, px: f32, py: f32, pz: f32, c: [f32; 4]) {
    v.extend_from_slice(&[px, py, pz, c[0], c[1], c[2], c[3]]);
}
