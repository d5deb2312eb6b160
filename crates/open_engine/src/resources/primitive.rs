//! Built-in primitive models
//!
//! `cube.prim` and `triangle.prim` name the shape through the file stem, so
//! nothing is read from disk.

use super::{ModelPlugin, ModelResource, ModelResourcePtr, ResourceError};
use crate::geometry::Mesh;
use crate::scene::{Geometry, SceneNode};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Shapes the primitive plugin can build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// Unit cube, 12 triangles
    Cube,
    /// Single triangle in the XY plane
    Triangle,
}

impl Primitive {
    /// Shape for a file stem such as `cube`
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "cube" => Some(Self::Cube),
            "triangle" => Some(Self::Triangle),
            _ => None,
        }
    }

    /// Indexed mesh of the shape
    pub fn mesh(self) -> Mesh {
        match self {
            Self::Cube => Mesh::cube(),
            Self::Triangle => Mesh::triangle(),
        }
    }
}

/// Model resource for one primitive
#[derive(Debug)]
pub struct PrimitiveResource {
    path: PathBuf,
    node: Option<SceneNode>,
}

impl PrimitiveResource {
    /// Unloaded resource for `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            node: None,
        }
    }

    /// Whether [`ModelResource::load`] has run
    pub fn is_loaded(&self) -> bool {
        self.node.is_some()
    }
}

impl ModelResource for PrimitiveResource {
    fn load(&mut self) -> Result<(), ResourceError> {
        if self.node.is_some() {
            return Ok(());
        }

        let stem = self
            .path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default();
        let primitive = Primitive::from_name(stem).ok_or_else(|| {
            ResourceError::Load(format!("unknown primitive '{}'", self.path.display()))
        })?;

        let faces = primitive.mesh().to_face_set();
        log::debug!("Loaded {:?} primitive with {} faces", primitive, faces.len());
        self.node = Some(SceneNode::new(Geometry::new(faces)));
        Ok(())
    }

    fn unload(&mut self) {
        self.node = None;
    }

    fn scene_node(&self) -> Result<SceneNode, ResourceError> {
        self.node
            .clone()
            .ok_or_else(|| ResourceError::NotLoaded(self.path.display().to_string()))
    }
}

/// Plugin for `*.prim` model names
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimitiveModelPlugin;

impl ModelPlugin for PrimitiveModelPlugin {
    fn accepts(&self, ext: &str) -> bool {
        ext.eq_ignore_ascii_case("prim")
    }

    fn create(&self, path: &Path) -> Result<ModelResourcePtr, ResourceError> {
        Ok(Rc::new(RefCell::new(PrimitiveResource::new(path))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_node_requires_load() {
        let mut resource = PrimitiveResource::new("triangle.prim");
        assert!(matches!(resource.scene_node(), Err(ResourceError::NotLoaded(_))));

        resource.load().unwrap();
        assert!(resource.is_loaded());
        let node = resource.scene_node().unwrap();
        assert_eq!(node.payload::<Geometry>().unwrap().faces.len(), 1);

        resource.unload();
        assert!(!resource.is_loaded());
        assert!(resource.scene_node().is_err());
    }

    #[test]
    fn test_cube_has_twelve_faces() {
        let mut resource = PrimitiveResource::new("models/Cube.prim");
        resource.load().unwrap();
        let node = resource.scene_node().unwrap();
        assert_eq!(node.payload::<Geometry>().unwrap().faces.len(), 12);
    }

    #[test]
    fn test_load_is_idempotent() {
        let mut resource = PrimitiveResource::new("cube.prim");
        resource.load().unwrap();
        let first = resource.scene_node().unwrap();
        resource.load().unwrap();
        assert!(first.ptr_eq(&resource.scene_node().unwrap()));
    }

    #[test]
    fn test_unknown_primitive_fails_to_load() {
        let mut resource = PrimitiveResource::new("sphere.prim");
        assert!(matches!(resource.load(), Err(ResourceError::Load(_))));
    }

    #[test]
    fn test_plugin_accepts_prim_only() {
        assert!(PrimitiveModelPlugin.accepts("prim"));
        assert!(!PrimitiveModelPlugin.accepts("obj"));
    }
}
