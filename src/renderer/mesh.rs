//! CPU-side triangle mesh.

use glam::{BVec3, Vec3};

/// Indexed triangle mesh with per-vertex position, colour and normal, each
/// stored as flat `f32` triples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Triangle indices, three per face.
    pub indices: Vec<u32>,
    /// Vertex positions `[x, y, z, ...]`.
    pub positions: Vec<f32>,
    /// Vertex colours `[r, g, b, ...]`.
    pub colors: Vec<f32>,
    /// Vertex normals `[x, y, z, ...]`.
    pub normals: Vec<f32>,
}

impl MeshData {
    /// An empty mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the mesh has no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Append a vertex, returning its index.
    pub fn push_vertex(
        &mut self,
        position: Vec3,
        normal: Vec3,
        color: Vec3,
    ) -> u32 {
        let index = self.vertex_count() as u32;
        self.positions.extend_from_slice(&position.to_array());
        self.normals.extend_from_slice(&normal.to_array());
        self.colors.extend_from_slice(&color.to_array());
        index
    }

    /// Append a triangle over existing vertices.
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Append an axis-aligned box between `min` and `max` with flat-shaded
    /// faces.
    pub fn push_cuboid(&mut self, min: Vec3, max: Vec3, color: Vec3) {
        // Corners are coded as bit masks: 4 = max x, 2 = max y, 1 = max z.
        const FACES: [(Vec3, [u8; 4]); 6] = [
            (Vec3::X, [4, 6, 7, 5]),
            (Vec3::NEG_X, [1, 3, 2, 0]),
            (Vec3::Y, [2, 3, 7, 6]),
            (Vec3::NEG_Y, [1, 0, 4, 5]),
            (Vec3::Z, [1, 5, 7, 3]),
            (Vec3::NEG_Z, [4, 0, 2, 6]),
        ];
        let corner = |bits: u8| {
            let mask = BVec3::new(bits & 4 != 0, bits & 2 != 0, bits & 1 != 0);
            Vec3::select(mask, max, min)
        };
        for (normal, corners) in FACES {
            let [a, b, c, d] = corners
                .map(|bits| self.push_vertex(corner(bits), normal, color));
            self.push_triangle(a, b, c);
            self.push_triangle(a, c, d);
        }
    }

    /// Overwrite the colour of vertices `range` (vertex indices).
    pub fn recolor(&mut self, range: std::ops::Range<usize>, color: Vec3) {
        for v in range {
            if let Some(rgb) = self.colors.get_mut(v * 3..v * 3 + 3) {
                rgb.copy_from_slice(&color.to_array());
            }
        }
    }

    /// Componentwise minimum and maximum vertex position, `None` when the
    /// mesh has no vertices.
    #[must_use]
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut points = self.positions.chunks_exact(3).map(Vec3::from_slice);
        let first = points.next()?;
        Some(points.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }
}
