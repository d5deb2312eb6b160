//! Visitor double dispatch over scene nodes
//!
//! [`SceneNode::accept`] calls the `visit_*` method matching the node's kind.
//! Every `visit_*` method defaults to [`SceneNodeVisitor::default_visit_node`],
//! which in turn defaults to visiting the children. A visitor therefore only
//! overrides the kinds it cares about, and traversal continues through
//! everything else.
//!
//! To stop descending below a kind, override its method without calling
//! `visit_sub_nodes`. To stop everywhere else, override `default_visit_node`.

use super::{SceneError, SceneNode};

/// Result of visiting a node; an error aborts the whole traversal
pub type VisitResult = Result<(), SceneError>;

/// Per-kind callbacks invoked by [`SceneNode::accept`]
pub trait SceneNodeVisitor {
    /// Fallback for every kind that is not overridden
    fn default_visit_node(&mut self, node: &SceneNode) -> VisitResult {
        node.visit_sub_nodes(self)
    }

    /// Plain grouping node
    fn visit_scene_node(&mut self, node: &SceneNode) -> VisitResult {
        self.default_visit_node(node)
    }

    /// Transformation node
    fn visit_transformation_node(&mut self, node: &SceneNode) -> VisitResult {
        self.default_visit_node(node)
    }

    /// Geometry node
    fn visit_geometry_node(&mut self, node: &SceneNode) -> VisitResult {
        self.default_visit_node(node)
    }

    /// Mesh node
    fn visit_mesh_node(&mut self, node: &SceneNode) -> VisitResult {
        self.default_visit_node(node)
    }

    /// Model node
    fn visit_model_node(&mut self, node: &SceneNode) -> VisitResult {
        self.default_visit_node(node)
    }

    /// Render state node
    fn visit_render_state_node(&mut self, node: &SceneNode) -> VisitResult {
        self.default_visit_node(node)
    }

    /// Blending node
    fn visit_blending_node(&mut self, node: &SceneNode) -> VisitResult {
        self.default_visit_node(node)
    }

    /// Directional light node
    fn visit_directional_light_node(&mut self, node: &SceneNode) -> VisitResult {
        self.default_visit_node(node)
    }

    /// Point light node
    fn visit_point_light_node(&mut self, node: &SceneNode) -> VisitResult {
        self.default_visit_node(node)
    }

    /// Spot light node
    fn visit_spot_light_node(&mut self, node: &SceneNode) -> VisitResult {
        self.default_visit_node(node)
    }

    /// Property node
    fn visit_property_node(&mut self, node: &SceneNode) -> VisitResult {
        self.default_visit_node(node)
    }
}
