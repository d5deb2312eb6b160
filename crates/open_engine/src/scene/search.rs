//! Queries for nodes by kind and by property along the child, descendant
//! and ancestor axes
//!
//! ```rust
//! use open_engine::scene::{NodeType, Properties, SceneNode, SearchTool};
//!
//! let scene = SceneNode::group();
//! let tag = SceneNode::new(Properties::new().with("id", "gun"));
//! let gun = SceneNode::group();
//! scene.add_node(&tag).unwrap();
//! tag.add_node(&gun).unwrap();
//!
//! let found = SearchTool::descendant_property_with(&scene, "id", "gun")
//!     .and_then(|tag| SearchTool::child(&tag, NodeType::Scene));
//! assert_eq!(found, Some(gun));
//! ```

use super::{NodeType, Properties, PropertyValue, SceneNode, SceneNodeVisitor, VisitResult};

/// Collects nodes matching a predicate
struct Finder<P> {
    predicate: P,
    first_only: bool,
    descend: bool,
    found: Vec<SceneNode>,
}

impl<P: Fn(&SceneNode) -> bool> Finder<P> {
    fn new(predicate: P, first_only: bool, descend: bool) -> Self {
        Self {
            predicate,
            first_only,
            descend,
            found: Vec::new(),
        }
    }

    fn done(&self) -> bool {
        self.first_only && !self.found.is_empty()
    }

    fn search_below(mut self, root: &SceneNode) -> Vec<SceneNode> {
        if let Err(err) = root.visit_sub_nodes(&mut self) {
            log::error!("Search aborted: {err}");
        }
        self.found
    }
}

impl<P: Fn(&SceneNode) -> bool> SceneNodeVisitor for Finder<P> {
    fn default_visit_node(&mut self, node: &SceneNode) -> VisitResult {
        if self.done() {
            return Ok(());
        }
        let matched = (self.predicate)(node);
        if matched {
            self.found.push(node.clone());
        }
        if self.descend && !(matched && self.first_only) {
            node.visit_sub_nodes(self)?;
        }
        Ok(())
    }
}

fn of_type(node_type: NodeType) -> impl Fn(&SceneNode) -> bool {
    move |node| node.node_type() == node_type
}

fn property_with(key: &str, value: PropertyValue) -> impl Fn(&SceneNode) -> bool + '_ {
    move |node| {
        node.payload::<Properties>()
            .is_some_and(|properties| properties.matches(key, &value))
    }
}

/// Scene search helpers
///
/// Child queries look at the direct children only, descendant queries walk
/// the subtree depth-first in child order, ancestor queries walk the parent
/// chain upwards. The queried node itself is never part of the result.
pub struct SearchTool;

impl SearchTool {
    /// First direct child matching `predicate`
    pub fn child_where(root: &SceneNode, predicate: impl Fn(&SceneNode) -> bool) -> Option<SceneNode> {
        Finder::new(predicate, true, false).search_below(root).pop()
    }

    /// Every direct child matching `predicate`
    pub fn children_where(root: &SceneNode, predicate: impl Fn(&SceneNode) -> bool) -> Vec<SceneNode> {
        Finder::new(predicate, false, false).search_below(root)
    }

    /// First descendant matching `predicate`, in depth-first order
    pub fn descendant_where(
        root: &SceneNode,
        predicate: impl Fn(&SceneNode) -> bool,
    ) -> Option<SceneNode> {
        Finder::new(predicate, true, true).search_below(root).pop()
    }

    /// Every descendant matching `predicate`, in depth-first order
    pub fn descendants_where(
        root: &SceneNode,
        predicate: impl Fn(&SceneNode) -> bool,
    ) -> Vec<SceneNode> {
        Finder::new(predicate, false, true).search_below(root)
    }

    /// Nearest ancestor matching `predicate`
    pub fn ancestor_where(node: &SceneNode, predicate: impl Fn(&SceneNode) -> bool) -> Option<SceneNode> {
        node.ancestors().find(|ancestor| predicate(ancestor))
    }

    /// Every ancestor matching `predicate`, nearest first
    pub fn ancestors_where(node: &SceneNode, predicate: impl Fn(&SceneNode) -> bool) -> Vec<SceneNode> {
        node.ancestors().filter(|ancestor| predicate(ancestor)).collect()
    }

    /// First direct child of `node_type`
    pub fn child(root: &SceneNode, node_type: NodeType) -> Option<SceneNode> {
        Self::child_where(root, of_type(node_type))
    }

    /// Every direct child of `node_type`
    pub fn children(root: &SceneNode, node_type: NodeType) -> Vec<SceneNode> {
        Self::children_where(root, of_type(node_type))
    }

    /// First descendant of `node_type`
    pub fn descendant(root: &SceneNode, node_type: NodeType) -> Option<SceneNode> {
        Self::descendant_where(root, of_type(node_type))
    }

    /// Every descendant of `node_type`
    pub fn descendants(root: &SceneNode, node_type: NodeType) -> Vec<SceneNode> {
        Self::descendants_where(root, of_type(node_type))
    }

    /// Nearest ancestor of `node_type`
    pub fn ancestor(node: &SceneNode, node_type: NodeType) -> Option<SceneNode> {
        Self::ancestor_where(node, of_type(node_type))
    }

    /// Every ancestor of `node_type`, nearest first
    pub fn ancestors(node: &SceneNode, node_type: NodeType) -> Vec<SceneNode> {
        Self::ancestors_where(node, of_type(node_type))
    }

    /// First direct child property node holding `key` = `value`
    pub fn child_property_with(
        root: &SceneNode,
        key: &str,
        value: impl Into<PropertyValue>,
    ) -> Option<SceneNode> {
        Self::child_where(root, property_with(key, value.into()))
    }

    /// Every direct child property node holding `key` = `value`
    pub fn child_properties_with(
        root: &SceneNode,
        key: &str,
        value: impl Into<PropertyValue>,
    ) -> Vec<SceneNode> {
        Self::children_where(root, property_with(key, value.into()))
    }

    /// First descendant property node holding `key` = `value`
    pub fn descendant_property_with(
        root: &SceneNode,
        key: &str,
        value: impl Into<PropertyValue>,
    ) -> Option<SceneNode> {
        Self::descendant_where(root, property_with(key, value.into()))
    }

    /// Every descendant property node holding `key` = `value`
    pub fn descendant_properties_with(
        root: &SceneNode,
        key: &str,
        value: impl Into<PropertyValue>,
    ) -> Vec<SceneNode> {
        Self::descendants_where(root, property_with(key, value.into()))
    }

    /// Nearest ancestor property node holding `key` = `value`
    pub fn ancestor_property_with(
        node: &SceneNode,
        key: &str,
        value: impl Into<PropertyValue>,
    ) -> Option<SceneNode> {
        Self::ancestor_where(node, property_with(key, value.into()))
    }

    /// Every ancestor property node holding `key` = `value`, nearest first
    pub fn ancestor_properties_with(
        node: &SceneNode,
        key: &str,
        value: impl Into<PropertyValue>,
    ) -> Vec<SceneNode> {
        Self::ancestors_where(node, property_with(key, value.into()))
    }
}
