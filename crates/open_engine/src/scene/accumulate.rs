//! World-space transformation of a node, accumulated along its parent chain

use super::{SceneNode, SceneNodeVisitor, Transformation, VisitResult};
use crate::foundation::math::{Mat4, Quat, Vec3};

/// Visitor that walks from a node up to the root and folds every
/// transformation on the way, outermost first
#[derive(Debug, Clone, PartialEq)]
pub struct TransformationAccumulator {
    position: Vec3,
    rotation: Quat,
    matrix: Mat4,
}

impl Default for TransformationAccumulator {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            matrix: Mat4::identity(),
        }
    }
}

impl TransformationAccumulator {
    /// Identity accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulated translation (scale not applied)
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Accumulated rotation
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Product of every transformation matrix from the root down
    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    fn visit_parent(&mut self, node: &SceneNode) -> VisitResult {
        match node.parent() {
            Some(parent) => parent.accept(self),
            None => Ok(()),
        }
    }
}

impl SceneNodeVisitor for TransformationAccumulator {
    fn default_visit_node(&mut self, node: &SceneNode) -> VisitResult {
        self.visit_parent(node)
    }

    fn visit_transformation_node(&mut self, node: &SceneNode) -> VisitResult {
        self.visit_parent(node)?;
        if let Some(local) = node.payload::<Transformation>() {
            self.position += self.rotation * local.position();
            self.rotation *= local.rotation();
            self.matrix *= local.matrix();
        }
        Ok(())
    }
}

/// Transformation of `node` relative to the root, including `node` itself
/// when it is a transformation node
pub fn accumulated_transformation(node: &SceneNode) -> TransformationAccumulator {
    let mut accumulator = TransformationAccumulator::new();
    if let Err(err) = node.accept(&mut accumulator) {
        log::warn!("Transformation accumulation stopped early: {err}");
    }
    accumulator
}
