//! Triangles and triangle sets

use crate::foundation::math::{Vec2, Vec3, Vec4};

/// A triangle with per-vertex normals, texture coordinates and colors
///
/// The hard normal and the tangent frame are derived from the vertices and
/// texture coordinates; call [`Face::recalculate`] after editing them.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    /// Vertex positions
    pub vert: [Vec3; 3],
    /// Vertex normals
    pub norm: [Vec3; 3],
    /// Texture coordinates
    pub texc: [Vec2; 3],
    /// Vertex colors (RGBA)
    pub colr: [Vec4; 3],
    /// Face normal
    pub hard_norm: Vec3,
    /// Tangent along increasing U
    pub tangent: Vec3,
    /// Binormal along increasing V
    pub binormal: Vec3,
}

impl Face {
    /// Face from three points; vertex normals default to the face normal
    pub fn new(p0: Vec3, p1: Vec3, p2: Vec3) -> Self {
        let mut face = Self {
            vert: [p0, p1, p2],
            norm: [Vec3::zeros(); 3],
            texc: [Vec2::zeros(); 3],
            colr: [Vec4::repeat(1.0); 3],
            hard_norm: Vec3::zeros(),
            tangent: Vec3::zeros(),
            binormal: Vec3::zeros(),
        };
        face.recalculate();
        face.norm = [face.hard_norm; 3];
        face
    }

    /// Face from three points and their normals
    pub fn with_normals(vert: [Vec3; 3], norm: [Vec3; 3]) -> Self {
        let mut face = Self::new(vert[0], vert[1], vert[2]);
        face.norm = norm;
        face
    }

    /// Set texture coordinates and refresh the tangent frame
    pub fn with_tex_coords(mut self, texc: [Vec2; 3]) -> Self {
        self.texc = texc;
        self.recalculate();
        self
    }

    /// Recompute the hard normal and tangent frame
    pub fn recalculate(&mut self) {
        let edge1 = self.vert[1] - self.vert[0];
        let edge2 = self.vert[2] - self.vert[0];
        self.hard_norm = edge1.cross(&edge2).try_normalize(f32::EPSILON).unwrap_or_else(Vec3::zeros);

        let duv1 = self.texc[1] - self.texc[0];
        let duv2 = self.texc[2] - self.texc[0];
        let det = duv1.x * duv2.y - duv2.x * duv1.y;
        if det.abs() <= f32::EPSILON {
            // Degenerate mapping, no meaningful tangent space
            self.tangent = Vec3::zeros();
            self.binormal = Vec3::zeros();
            return;
        }
        let r = 1.0 / det;
        self.tangent = ((edge1 * duv2.y - edge2 * duv1.y) * r)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vec3::zeros);
        self.binormal = ((edge2 * duv1.x - edge1 * duv2.x) * r)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vec3::zeros);
    }

    /// Centroid of the triangle
    pub fn center(&self) -> Vec3 {
        (self.vert[0] + self.vert[1] + self.vert[2]) / 3.0
    }
}

/// Ordered collection of faces
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaceSet {
    faces: Vec<Face>,
}

impl FaceSet {
    /// Empty face set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a face
    pub fn add(&mut self, face: Face) {
        self.faces.push(face);
    }

    /// Append every face of another set
    pub fn add_all(&mut self, other: &Self) {
        self.faces.extend(other.faces.iter().cloned());
    }

    /// Number of faces
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Whether the set has no faces
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Iterate over the faces in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Face> {
        self.faces.iter()
    }

    /// Mutable iteration, e.g. to recolor faces
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Face> {
        self.faces.iter_mut()
    }
}

impl FromIterator<Face> for FaceSet {
    fn from_iter<I: IntoIterator<Item = Face>>(iter: I) -> Self {
        Self {
            faces: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FaceSet {
    type Item = &'a Face;
    type IntoIter = std::slice::Iter<'a, Face>;

    fn into_iter(self) -> Self::IntoIter {
        self.faces.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_hard_normal_follows_winding() {
        let face = Face::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        assert_relative_eq!(face.hard_norm, Vec3::new(0.0, 0.0, 1.0), epsilon = 1e-6);
        assert_relative_eq!(face.norm[2], face.hard_norm, epsilon = 1e-6);
        assert_eq!(face.colr[0], Vec4::repeat(1.0));
    }

    #[test]
    fn test_tangent_frame_from_tex_coords() {
        let face = Face::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
        )
        .with_tex_coords([Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)]);
        assert_relative_eq!(face.tangent, Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(face.binormal, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_degenerate_face_has_zero_normal() {
        let p = Vec3::new(1.0, 1.0, 1.0);
        let face = Face::new(p, p, p);
        assert_eq!(face.hard_norm, Vec3::zeros());
        assert_eq!(face.tangent, Vec3::zeros());
    }

    #[test]
    fn test_face_set_collects_in_order() {
        let a = Face::new(Vec3::zeros(), Vec3::x(), Vec3::y());
        let b = Face::new(Vec3::zeros(), Vec3::y(), Vec3::z());
        let set: FaceSet = vec![a.clone(), b.clone()].into_iter().collect();
        assert_eq!(set.len(), 2);
        let faces: Vec<_> = set.iter().cloned().collect();
        assert_eq!(faces, vec![a, b]);
    }
}
