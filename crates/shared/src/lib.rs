use serde::{Deserialize, Serialize};

pub mod error;

pub use error::{
    AnalysisError, ErrorKind, Failure, ParseError, PipelineError, ReadError, SelectionError,
};

/// 3-component point or vector, in the source file's native units
pub type Vec3 = [f32; 3];

/// Token identifying one file-selection episode.
///
/// The sequence id grows monotonically per viewer; two tokens refer to the
/// same episode only when their ids match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileRef {
    seq: u64,
    name: String,
    size: u64,
}

impl FileRef {
    pub fn new(seq: u64, name: impl Into<String>, size: u64) -> Self {
        Self {
            seq,
            name: name.into(),
            size,
        }
    }

    /// Sequence id of the selection
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Display name of the selected file
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Byte length reported by the selection (display only)
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn is_same_episode(&self, other: &FileRef) -> bool {
        self.seq == other.seq
    }

    /// Size label such as `1.25 MB`
    pub fn size_label(&self) -> String {
        format_size_mb(self.size)
    }
}

/// Format a byte count as megabytes with two decimals.
pub fn format_size_mb(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

/// Encoding an STL stream was decoded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StlFormat {
    Binary,
    Ascii,
}

impl std::fmt::Display for StlFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StlFormat::Binary => write!(f, "binary"),
            StlFormat::Ascii => write!(f, "ASCII"),
        }
    }
}

/// One STL facet: a face normal (possibly zero) and three corners
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Triangle {
    pub normal: Vec3,
    pub vertices: [Vec3; 3],
}

impl Triangle {
    pub fn new(normal: Vec3, vertices: [Vec3; 3]) -> Self {
        Self { normal, vertices }
    }

    /// Triangle with an unset (zero) normal
    pub fn from_vertices(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self {
            normal: [0.0; 3],
            vertices: [a, b, c],
        }
    }

    /// True when the stored normal is finite and not the zero vector
    pub fn has_normal(&self) -> bool {
        let [x, y, z] = self.normal;
        x.is_finite() && y.is_finite() && z.is_finite() && (x != 0.0 || y != 0.0 || z != 0.0)
    }
}

/// Ordered triangle soup as decoded from the file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawMesh {
    pub triangles: Vec<Triangle>,
}

impl RawMesh {
    pub fn new(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Length of the flattened vertex list (three per triangle)
    pub fn vertex_count(&self) -> usize {
        self.triangles.len() * 3
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Flattened vertex positions in triangle order
    pub fn positions(&self) -> impl Iterator<Item = &Vec3> + '_ {
        self.triangles.iter().flat_map(|t| t.vertices.iter())
    }
}

/// Shared-vertex representation: unique positions plus an index buffer
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IndexedGeometry {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

/// Renderable mesh: the raw triangles plus per-vertex shading normals.
///
/// `normals` has one entry per flattened vertex (`raw.vertex_count()`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Mesh {
    pub raw: RawMesh,
    pub normals: Vec<Vec3>,
    pub indexed: Option<IndexedGeometry>,
}

impl Mesh {
    pub fn triangle_count(&self) -> usize {
        self.raw.triangle_count()
    }

    pub fn vertex_count(&self) -> usize {
        self.raw.vertex_count()
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Extent along each axis (max - min)
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.max[0] - self.min[0],
            height: self.max[1] - self.min[1],
            depth: self.max[2] - self.min[2],
        }
    }

    pub fn center(&self) -> Vec3 {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
            (self.min[2] + self.max[2]) * 0.5,
        ]
    }

    /// Length of the min→max diagonal
    pub fn diagonal(&self) -> f32 {
        let d = self.dimensions();
        (d.width * d.width + d.height * d.height + d.depth * d.depth).sqrt()
    }

    pub fn contains(&self, p: &Vec3) -> bool {
        (0..3).all(|i| self.min[i] <= p[i] && p[i] <= self.max[i])
    }
}

/// Bounding extents in the file's native units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Dimensions {
    /// Format each axis with `precision` decimal digits
    pub fn formatted(&self, precision: usize) -> DimensionReadout {
        DimensionReadout {
            width: format!("{:.*}", precision, self.width),
            height: format!("{:.*}", precision, self.height),
            depth: format!("{:.*}", precision, self.depth),
        }
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} x {:.2} x {:.2}", self.width, self.height, self.depth)
    }
}

/// Display strings for the dimension readout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionReadout {
    pub width: String,
    pub height: String,
    pub depth: String,
}

/// Variant tag of the viewer state, for presentation collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateTag {
    Idle,
    Loading,
    Ready,
    Failed,
}

impl std::fmt::Display for StateTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateTag::Idle => write!(f, "idle"),
            StateTag::Loading => write!(f, "loading"),
            StateTag::Ready => write!(f, "ready"),
            StateTag::Failed => write!(f, "failed"),
        }
    }
}
