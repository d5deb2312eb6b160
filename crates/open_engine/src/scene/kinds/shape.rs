//! Drawable payloads

use crate::geometry::{FaceSet, Material, Mesh};
use std::rc::Rc;

/// Explicit triangle list, owned by the node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    /// Triangles to draw
    pub faces: FaceSet,
}

impl Geometry {
    /// Geometry over the given faces
    pub fn new(faces: FaceSet) -> Self {
        Self { faces }
    }
}

/// Shared mesh drawn with one material
#[derive(Debug, Clone)]
pub struct MeshInstance {
    /// Shared vertex data
    pub mesh: Rc<Mesh>,
    /// Shared surface description
    pub material: Rc<Material>,
}

impl MeshInstance {
    /// Instance of `mesh` with `material`
    pub fn new(mesh: Rc<Mesh>, material: Rc<Material>) -> Self {
        Self { mesh, material }
    }
}

/// Several mesh instances forming one model
#[derive(Debug, Clone, Default)]
pub struct ModelInstance {
    /// Parts in draw order
    pub parts: Vec<MeshInstance>,
}

impl ModelInstance {
    /// Model from its parts
    pub fn new(parts: Vec<MeshInstance>) -> Self {
        Self { parts }
    }

    /// Total triangle count over all parts
    pub fn triangle_count(&self) -> usize {
        self.parts.iter().map(|part| part.mesh.triangle_count()).sum()
    }
}
