//! Scene graph
//!
//! Tree of typed [`SceneNode`]s traversed by [`SceneNodeVisitor`]s.
//!
//! ## Architecture
//!
//! ```text
//! SceneNode (handle)
//!      ↓ accept(visitor)
//! SceneNodeVisitor::visit_<kind>_node
//!      ↓ default_visit_node
//! SceneNode::visit_sub_nodes (snapshot of children)
//! ```
//!
//! Structural changes requested on a node while it is being traversed are
//! queued on that node and applied when its traversal ends.

pub mod kinds;

mod accumulate;
mod dot_visitor;
mod error;
mod node;
mod search;
mod strategy_visitor;
mod visitor;

#[cfg(test)]
mod tests;

pub use accumulate::{accumulated_transformation, TransformationAccumulator};
pub use dot_visitor::DotVisitor;
pub use error::SceneError;
pub use kinds::{
    BlendEquation, BlendFactor, Blending, DirectionalLight, Geometry, Light, MeshInstance,
    ModelInstance, NodeKind, NodePayload, NodeType, PointLight, Properties, PropertyValue,
    RenderState, RenderStateOptions, SpotLight, Transformation,
};
pub use node::{SceneNode, WeakSceneNode};
pub use search::SearchTool;
pub use strategy_visitor::{StrategyVisitor, VisitStrategy};
pub use visitor::{SceneNodeVisitor, VisitResult};
