//! Indexed triangle meshes

use super::{Face, FaceSet};
use crate::foundation::math::{Vec2, Vec3};

/// 3D vertex with position, normal and texture coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in 3D space
    pub position: [f32; 3],

    /// Normal vector
    pub normal: [f32; 3],

    /// Texture coordinates
    pub tex_coord: [f32; 2],
}

impl Vertex {
    /// Create a new vertex
    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            tex_coord,
        }
    }
}

/// 3D mesh containing vertices and triangle indices
///
/// Mesh nodes share meshes through `Rc`, so large vertex buffers are not
/// duplicated when a subtree is cloned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex data
    pub vertices: Vec<Vertex>,

    /// Index data for triangles
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new mesh
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Unit cube centered at the origin with vertices at ±1.0 on each axis
    ///
    /// 8 shared vertices, 36 indices (12 triangles), Y-up right-handed.
    pub fn cube() -> Self {
        let vertices = vec![
            // Front face
            Vertex::new([-1.0, -1.0, 1.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
            Vertex::new([1.0, -1.0, 1.0], [0.0, 0.0, 1.0], [1.0, 0.0]),
            Vertex::new([1.0, 1.0, 1.0], [0.0, 0.0, 1.0], [1.0, 1.0]),
            Vertex::new([-1.0, 1.0, 1.0], [0.0, 0.0, 1.0], [0.0, 1.0]),
            // Back face
            Vertex::new([-1.0, -1.0, -1.0], [0.0, 0.0, -1.0], [1.0, 0.0]),
            Vertex::new([-1.0, 1.0, -1.0], [0.0, 0.0, -1.0], [1.0, 1.0]),
            Vertex::new([1.0, 1.0, -1.0], [0.0, 0.0, -1.0], [0.0, 1.0]),
            Vertex::new([1.0, -1.0, -1.0], [0.0, 0.0, -1.0], [0.0, 0.0]),
        ];

        let indices = vec![
            // Front
            0, 1, 2, 2, 3, 0,
            // Back
            4, 5, 6, 6, 7, 4,
            // Left
            4, 0, 3, 3, 5, 4,
            // Right
            1, 7, 6, 6, 2, 1,
            // Top
            3, 2, 6, 6, 5, 3,
            // Bottom
            4, 7, 1, 1, 0, 4,
        ];

        Self::new(vertices, indices)
    }

    /// Single triangle in the XY plane facing +Z
    pub fn triangle() -> Self {
        let normal = [0.0, 0.0, 1.0];
        Self::new(
            vec![
                Vertex::new([0.0, 0.0, 0.0], normal, [0.0, 0.0]),
                Vertex::new([1.0, 0.0, 0.0], normal, [1.0, 0.0]),
                Vertex::new([0.0, 1.0, 0.0], normal, [0.0, 1.0]),
            ],
            vec![0, 1, 2],
        )
    }

    /// Number of complete triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Expand the indexed triangles into standalone faces
    ///
    /// Triangles referencing a vertex out of range are skipped.
    pub fn to_face_set(&self) -> FaceSet {
        self.indices
            .chunks_exact(3)
            .filter_map(|tri| {
                let fetch = |i: u32| self.vertices.get(usize::try_from(i).ok()?);
                let (a, b, c) = (fetch(tri[0])?, fetch(tri[1])?, fetch(tri[2])?);
                let face = Face::with_normals(
                    [a.position.into(), b.position.into(), c.position.into()],
                    [a.normal.into(), b.normal.into(), c.normal.into()],
                )
                .with_tex_coords([
                    Vec2::from(a.tex_coord),
                    Vec2::from(b.tex_coord),
                    Vec2::from(c.tex_coord),
                ]);
                Some(face)
            })
            .collect()
    }

    /// Axis-aligned bounds as (min, max); `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = Vec3::from(self.vertices.first()?.position);
        Some(self.vertices.iter().fold((first, first), |(min, max), v| {
            let p = Vec3::from(v.position);
            (min.inf(&p), max.sup(&p))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cube_has_twelve_triangles() {
        let cube = Mesh::cube();
        assert_eq!(cube.triangle_count(), 12);
        assert_eq!(cube.to_face_set().len(), 12);
    }

    #[test]
    fn test_out_of_range_triangle_is_skipped() {
        let mut mesh = Mesh::triangle();
        mesh.indices.extend_from_slice(&[0, 1, 9]);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.to_face_set().len(), 1);
    }

    #[test]
    fn test_cube_bounds() {
        let (min, max) = Mesh::cube().bounds().unwrap();
        assert_relative_eq!(min, Vec3::new(-1.0, -1.0, -1.0));
        assert_relative_eq!(max, Vec3::new(1.0, 1.0, 1.0));
        assert!(Mesh::default().bounds().is_none());
    }
}
