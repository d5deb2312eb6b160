//! Visitor configured at runtime with one strategy per node kind

use super::{NodeType, SceneNode, SceneNodeVisitor, VisitResult};
use std::collections::HashMap;
use std::rc::Rc;

/// Behaviour run by a [`StrategyVisitor`] for one node kind
///
/// A strategy decides whether to descend by calling
/// `node.visit_sub_nodes(visitor)` itself.
pub trait VisitStrategy {
    /// Visit `node` on behalf of `visitor`
    fn visit(&self, node: &SceneNode, visitor: &mut StrategyVisitor) -> VisitResult;
}

impl<F> VisitStrategy for F
where
    F: Fn(&SceneNode, &mut StrategyVisitor) -> VisitResult,
{
    fn visit(&self, node: &SceneNode, visitor: &mut StrategyVisitor) -> VisitResult {
        self(node, visitor)
    }
}

/// Dispatches each node kind to its registered strategy
///
/// Kinds without a strategy fall back to `default_visit_node`, which
/// descends into the children.
#[derive(Default)]
pub struct StrategyVisitor {
    strategies: HashMap<NodeType, Rc<dyn VisitStrategy>>,
}

impl StrategyVisitor {
    /// Visitor without strategies
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `strategy` for `node_type`, returning the one it replaces
    pub fn set_strategy(
        &mut self,
        node_type: NodeType,
        strategy: impl VisitStrategy + 'static,
    ) -> Option<Rc<dyn VisitStrategy>> {
        self.strategies.insert(node_type, Rc::new(strategy))
    }

    /// Strategy registered for `node_type`
    pub fn strategy(&self, node_type: NodeType) -> Option<Rc<dyn VisitStrategy>> {
        self.strategies.get(&node_type).cloned()
    }

    /// Unregister the strategy for `node_type`
    pub fn clear_strategy(&mut self, node_type: NodeType) -> Option<Rc<dyn VisitStrategy>> {
        self.strategies.remove(&node_type)
    }

    fn dispatch(&mut self, node: &SceneNode) -> VisitResult {
        // Cloned out so the strategy may replace itself while running
        match self.strategy(node.node_type()) {
            Some(strategy) => strategy.visit(node, self),
            None => self.default_visit_node(node),
        }
    }
}

macro_rules! dispatch_to_strategy {
    ($($method:ident),* $(,)?) => {
        impl SceneNodeVisitor for StrategyVisitor {
            $(
                fn $method(&mut self, node: &SceneNode) -> VisitResult {
                    self.dispatch(node)
                }
            )*
        }
    };
}

dispatch_to_strategy! {
    visit_scene_node,
    visit_transformation_node,
    visit_geometry_node,
    visit_mesh_node,
    visit_model_node,
    visit_render_state_node,
    visit_blending_node,
    visit_directional_light_node,
    visit_point_light_node,
    visit_spot_light_node,
    visit_property_node,
}
