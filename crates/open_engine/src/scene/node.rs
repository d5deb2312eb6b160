//! Scene nodes and the deferred mutation protocol
//!
//! A [`SceneNode`] is a cheap handle to a shared node record. Parents own
//! their children; children refer back to their parent weakly.
//!
//! Structural requests made while a node is being traversed (its `accept`
//! is on the call stack) are queued on that node and applied in request order
//! once its outermost `accept` returns. Outside a traversal they apply
//! immediately. Traversals iterate over a snapshot of the children taken when
//! `visit_sub_nodes` starts, so nothing a visitor does can invalidate an
//! iteration in progress.

use super::kinds::{NodeKind, NodePayload, NodeType};
use super::{SceneError, SceneNodeVisitor, VisitResult};
use std::cell::{Cell, Ref, RefCell, RefMut};
use std::collections::VecDeque;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

enum PendingOperation {
    Remove(SceneNode),
    Delete(SceneNode),
    /// Clear the parent link of a node that was replaced
    Release(SceneNode),
    RemoveAll(Vec<SceneNode>),
    DeleteAll(Vec<SceneNode>),
}

struct NodeData {
    kind: NodeKind,
    parent: Weak<NodeCell>,
    children: Vec<SceneNode>,
    pending: VecDeque<PendingOperation>,
}

/// Shared node record
///
/// The accept depth lives outside the `RefCell` so an ending traversal can
/// always decrement it, even while the node data is borrowed.
struct NodeCell {
    accept_depth: Cell<u32>,
    data: RefCell<NodeData>,
}

/// Handle to a node in the scene graph
///
/// Cloning the handle does not copy the node; use [`SceneNode::deep_clone`]
/// for that. Equality and hashing compare node identity.
#[derive(Clone)]
pub struct SceneNode(Rc<NodeCell>);

/// Non-owning handle to a scene node
#[derive(Clone, Default)]
pub struct WeakSceneNode(Weak<NodeCell>);

impl WeakSceneNode {
    /// The node, if it still exists
    pub fn upgrade(&self) -> Option<SceneNode> {
        self.0.upgrade().map(SceneNode)
    }

    /// Whether the node still exists
    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}

/// Decrements the accept depth when an `accept` frame ends, including on
/// early return and unwinding, and drains the queue at depth zero
struct AcceptGuard<'a> {
    node: &'a SceneNode,
}

impl<'a> AcceptGuard<'a> {
    fn enter(node: &'a SceneNode) -> Self {
        let depth = &node.0.accept_depth;
        depth.set(depth.get() + 1);
        Self { node }
    }
}

impl Drop for AcceptGuard<'_> {
    fn drop(&mut self) {
        self.node.leave_accept();
    }
}

impl Default for SceneNode {
    fn default() -> Self {
        Self::group()
    }
}

impl SceneNode {
    /// Create a detached node
    pub fn new(kind: impl Into<NodeKind>) -> Self {
        Self(Rc::new(NodeCell {
            accept_depth: Cell::new(0),
            data: RefCell::new(NodeData {
                kind: kind.into(),
                parent: Weak::new(),
                children: Vec::new(),
                pending: VecDeque::new(),
            }),
        }))
    }

    /// Create a detached plain grouping node
    pub fn group() -> Self {
        Self::new(NodeKind::Scene)
    }

    // ---- identity and payload ----

    /// Whether both handles refer to the same node
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Non-owning handle to this node
    pub fn downgrade(&self) -> WeakSceneNode {
        WeakSceneNode(Rc::downgrade(&self.0))
    }

    /// Kind tag
    pub fn node_type(&self) -> NodeType {
        self.0.data.borrow().kind.node_type()
    }

    /// Node class name, e.g. `GeometryNode`
    pub fn type_name(&self) -> &'static str {
        self.node_type().name()
    }

    /// Borrow the kind and payload
    pub fn kind(&self) -> Ref<'_, NodeKind> {
        Ref::map(self.0.data.borrow(), |data| &data.kind)
    }

    /// Mutably borrow the kind and payload
    pub fn kind_mut(&self) -> RefMut<'_, NodeKind> {
        RefMut::map(self.0.data.borrow_mut(), |data| &mut data.kind)
    }

    /// Borrow the payload if this node is of kind `T`
    ///
    /// ```rust
    /// use open_engine::scene::{SceneNode, Transformation};
    ///
    /// let node = SceneNode::new(Transformation::new());
    /// assert!(node.payload::<Transformation>().is_some());
    /// ```
    pub fn payload<T: NodePayload>(&self) -> Option<Ref<'_, T>> {
        Ref::filter_map(self.0.data.borrow(), |data| T::from_kind(&data.kind)).ok()
    }

    /// Mutably borrow the payload if this node is of kind `T`
    pub fn payload_mut<T: NodePayload>(&self) -> Option<RefMut<'_, T>> {
        RefMut::filter_map(self.0.data.borrow_mut(), |data| T::from_kind_mut(&mut data.kind)).ok()
    }

    // ---- queries ----

    /// Parent node, `None` for roots and detached nodes
    pub fn parent(&self) -> Option<Self> {
        self.0.data.borrow().parent.upgrade().map(SceneNode)
    }

    /// Parent, grandparent, ... up to the root
    pub fn ancestors(&self) -> impl Iterator<Item = Self> {
        std::iter::successors(self.parent(), Self::parent)
    }

    /// Topmost ancestor, or the node itself
    pub fn root(&self) -> Self {
        self.ancestors().last().unwrap_or_else(|| self.clone())
    }

    /// Whether this node is a (transitive) parent of `node`
    pub fn is_ancestor_of(&self, node: &Self) -> bool {
        node.ancestors().any(|ancestor| ancestor.ptr_eq(self))
    }

    /// Snapshot of the children in order
    pub fn children(&self) -> Vec<Self> {
        self.0.data.borrow().children.clone()
    }

    /// Number of children
    pub fn number_of_nodes(&self) -> usize {
        self.0.data.borrow().children.len()
    }

    /// Child at `index`
    pub fn node(&self, index: usize) -> Option<Self> {
        self.0.data.borrow().children.get(index).cloned()
    }

    /// Position of `child` among the children
    pub fn index_of_node(&self, child: &Self) -> Option<usize> {
        self.0
            .data
            .borrow()
            .children
            .iter()
            .position(|c| c.ptr_eq(child))
    }

    /// Number of `accept` frames of this node currently on the stack
    pub fn accept_depth(&self) -> u32 {
        self.0.accept_depth.get()
    }

    /// Number of structural operations waiting for the traversal to end
    pub fn pending_operations(&self) -> usize {
        self.0.data.borrow().pending.len()
    }

    // ---- structure ----

    fn check_attachable(&self, child: &Self) -> Result<(), SceneError> {
        if child.ptr_eq(self) || child.is_ancestor_of(self) {
            return Err(SceneError::Cycle {
                node: child.type_name(),
            });
        }
        if child.parent().is_some() {
            return Err(SceneError::MultipleParents {
                node: child.type_name(),
            });
        }
        Ok(())
    }

    fn link_child(&self, child: &Self) {
        child.0.data.borrow_mut().parent = Rc::downgrade(&self.0);
        self.0.data.borrow_mut().children.push(child.clone());
    }

    /// Append `child` as the last child
    ///
    /// Fails if `child` already has a parent (which also rules out adding it
    /// twice) or if it is this node or one of its ancestors. Adding is never
    /// deferred: a node added during a traversal is not visited by
    /// `visit_sub_nodes` calls that already started.
    pub fn add_node(&self, child: &Self) -> Result<(), SceneError> {
        self.check_attachable(child)?;
        self.link_child(child);
        log::trace!("Attached {} to {}", child.type_name(), self.type_name());
        Ok(())
    }

    /// Detach `child`, keeping it alive for the caller
    ///
    /// Returns `false` (and logs a warning) if `child` is not a child of
    /// this node. During a traversal of this node the removal is queued.
    pub fn remove_node(&self, child: &Self) -> bool {
        self.request(child, "remove", PendingOperation::Remove)
    }

    /// Detach `child` and tear down its subtree
    ///
    /// Every descendant of `child` is detached recursively, so the subtree
    /// is freed as soon as no outside handle refers to it. Returns `false`
    /// (and logs a warning) if `child` is not a child of this node. During a
    /// traversal of this node the deletion is queued.
    pub fn delete_node(&self, child: &Self) -> bool {
        self.request(child, "delete", PendingOperation::Delete)
    }

    /// Put `new` in place of `old`, keeping its position
    ///
    /// `new` is validated like [`SceneNode::add_node`]. The swap happens
    /// immediately, so later `visit_sub_nodes` calls see `new`; clearing the
    /// parent link of `old` follows the deferral rule. Returns `Ok(false)`
    /// if `old` is not a child of this node.
    pub fn replace_node(&self, old: &Self, new: &Self) -> Result<bool, SceneError> {
        let Some(index) = self.index_of_node(old) else {
            log::warn!(
                "Cannot replace {}: not a child of {}",
                old.type_name(),
                self.type_name()
            );
            return Ok(false);
        };
        if old.ptr_eq(new) {
            return Ok(true);
        }
        self.check_attachable(new)?;

        new.0.data.borrow_mut().parent = Rc::downgrade(&self.0);
        self.0.data.borrow_mut().children[index] = new.clone();
        self.schedule(PendingOperation::Release(old.clone()));
        Ok(true)
    }

    /// Detach every child, keeping them alive for outside holders
    pub fn remove_all_nodes(&self) {
        let children = self.children();
        if !children.is_empty() {
            self.schedule(PendingOperation::RemoveAll(children));
        }
    }

    /// Detach every child and tear down their subtrees
    pub fn delete_all_nodes(&self) {
        let children = self.children();
        if !children.is_empty() {
            self.schedule(PendingOperation::DeleteAll(children));
        }
    }

    fn request(&self, child: &Self, verb: &str, operation: fn(Self) -> PendingOperation) -> bool {
        if self.index_of_node(child).is_none() {
            log::warn!(
                "Cannot {verb} {}: not a child of {}",
                child.type_name(),
                self.type_name()
            );
            return false;
        }
        self.schedule(operation(child.clone()));
        true
    }

    fn schedule(&self, operation: PendingOperation) {
        {
            let mut data = self.0.data.borrow_mut();
            if self.accept_depth() > 0 {
                log::debug!(
                    "Deferring structural change on {} until its traversal completes",
                    data.kind.node_type()
                );
                data.pending.push_back(operation);
                return;
            }
        }
        self.apply(operation);
    }

    fn apply(&self, operation: PendingOperation) {
        match operation {
            PendingOperation::Remove(child) => {
                self.unlink_child(&child);
            }
            PendingOperation::Delete(child) => {
                if self.unlink_child(&child) {
                    child.delete_all_nodes();
                }
            }
            PendingOperation::Release(old) => {
                let mut data = old.0.data.borrow_mut();
                if data.parent.as_ptr() == Rc::as_ptr(&self.0) {
                    data.parent = Weak::new();
                }
            }
            PendingOperation::RemoveAll(children) => {
                for child in &children {
                    self.unlink_child(child);
                }
            }
            PendingOperation::DeleteAll(children) => {
                for child in &children {
                    if self.unlink_child(child) {
                        child.delete_all_nodes();
                    }
                }
            }
        }
    }

    fn unlink_child(&self, child: &Self) -> bool {
        let removed = {
            let mut data = self.0.data.borrow_mut();
            match data.children.iter().position(|c| c.ptr_eq(child)) {
                Some(index) => {
                    data.children.remove(index);
                    true
                }
                None => false,
            }
        };
        if removed {
            child.0.data.borrow_mut().parent = Weak::new();
        } else {
            log::debug!(
                "{} is no longer a child of {}, skipping",
                child.type_name(),
                self.type_name()
            );
        }
        removed
    }

    fn leave_accept(&self) {
        let depth = self.0.accept_depth.get().saturating_sub(1);
        self.0.accept_depth.set(depth);
        if depth > 0 {
            return;
        }
        let pending = {
            // Queued operations stay queued and run when the next traversal
            // of this node ends.
            let Ok(mut data) = self.0.data.try_borrow_mut() else {
                log::error!("Scene node still borrowed when its traversal ended");
                return;
            };
            if data.pending.is_empty() {
                return;
            }
            std::mem::take(&mut data.pending)
        };
        for operation in pending {
            self.apply(operation);
        }
    }

    // ---- traversal ----

    /// Dispatch to the `visit_*` method of `visitor` matching this node's kind
    ///
    /// Structural changes requested on this node while it is being accepted
    /// are applied when the outermost `accept` of this node returns, whether
    /// it returns normally, with an error, or by unwinding.
    pub fn accept<V: SceneNodeVisitor + ?Sized>(&self, visitor: &mut V) -> VisitResult {
        let _guard = AcceptGuard::enter(self);
        match self.node_type() {
            NodeType::Scene => visitor.visit_scene_node(self),
            NodeType::Transformation => visitor.visit_transformation_node(self),
            NodeType::Geometry => visitor.visit_geometry_node(self),
            NodeType::Mesh => visitor.visit_mesh_node(self),
            NodeType::Model => visitor.visit_model_node(self),
            NodeType::RenderState => visitor.visit_render_state_node(self),
            NodeType::Blending => visitor.visit_blending_node(self),
            NodeType::DirectionalLight => visitor.visit_directional_light_node(self),
            NodeType::PointLight => visitor.visit_point_light_node(self),
            NodeType::SpotLight => visitor.visit_spot_light_node(self),
            NodeType::Property => visitor.visit_property_node(self),
        }
    }

    /// Accept `visitor` on each child, in order, stopping at the first error
    ///
    /// The children are snapshotted before the first one is visited.
    pub fn visit_sub_nodes<V: SceneNodeVisitor + ?Sized>(&self, visitor: &mut V) -> VisitResult {
        for child in self.children() {
            child.accept(visitor)?;
        }
        Ok(())
    }

    /// Detached structural copy of this node and its subtree
    pub fn deep_clone(&self) -> Self {
        let copy = Self::new(NodeKind::clone(&self.kind()));
        for child in self.children() {
            copy.link_child(&child.deep_clone());
        }
        copy
    }
}

impl PartialEq for SceneNode {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for SceneNode {}

impl Hash for SceneNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Rc::as_ptr(&self.0), state);
    }
}

impl fmt::Display for SceneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.data.try_borrow() {
            Ok(data) => f.write_str(data.kind.node_type().name()),
            Err(_) => f.write_str("SceneNode(<borrowed>)"),
        }
    }
}

impl fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.data.try_borrow() {
            Ok(data) => f
                .debug_struct("SceneNode")
                .field("type", &data.kind.node_type())
                .field("children", &data.children.len())
                .field("accept_depth", &self.0.accept_depth.get())
                .finish(),
            Err(_) => f.write_str("SceneNode(<borrowed>)"),
        }
    }
}

impl fmt::Debug for WeakSceneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(node) => write!(f, "WeakSceneNode({node:?})"),
            None => f.write_str("WeakSceneNode(<dropped>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::kinds::{Geometry, Properties, Transformation};
    use approx::assert_relative_eq;

    fn chain() -> (SceneNode, SceneNode, SceneNode) {
        let root = SceneNode::group();
        let middle = SceneNode::new(Transformation::new());
        let leaf = SceneNode::new(Geometry::default());
        root.add_node(&middle).unwrap();
        middle.add_node(&leaf).unwrap();
        (root, middle, leaf)
    }

    #[test]
    fn test_add_sets_parent_and_order() {
        let root = SceneNode::group();
        let a = SceneNode::group();
        let b = SceneNode::group();
        root.add_node(&a).unwrap();
        root.add_node(&b).unwrap();

        assert_eq!(root.number_of_nodes(), 2);
        assert_eq!(root.node(0), Some(a.clone()));
        assert_eq!(root.index_of_node(&b), Some(1));
        assert_eq!(a.parent(), Some(root.clone()));
        assert!(root.node(2).is_none());
    }

    #[test]
    fn test_add_rejects_node_with_parent() {
        let first = SceneNode::group();
        let second = SceneNode::group();
        let child = SceneNode::group();
        first.add_node(&child).unwrap();

        assert_eq!(
            second.add_node(&child),
            Err(SceneError::MultipleParents { node: "SceneNode" })
        );
        assert!(matches!(
            first.add_node(&child),
            Err(SceneError::MultipleParents { .. })
        ));
        assert_eq!(first.number_of_nodes(), 1);
        assert_eq!(second.number_of_nodes(), 0);
    }

    #[test]
    fn test_add_rejects_cycles() {
        let (root, middle, leaf) = chain();
        assert!(matches!(leaf.add_node(&root), Err(SceneError::Cycle { .. })));
        assert!(matches!(leaf.add_node(&middle), Err(SceneError::Cycle { .. })));
        assert!(matches!(root.add_node(&root), Err(SceneError::Cycle { .. })));
    }

    #[test]
    fn test_remove_outside_traversal_is_immediate() {
        let (root, middle, leaf) = chain();
        assert!(root.remove_node(&middle));
        assert_eq!(root.number_of_nodes(), 0);
        assert!(middle.parent().is_none());
        // the removed subtree is intact
        assert_eq!(leaf.parent(), Some(middle.clone()));
        assert!(!root.remove_node(&middle));
    }

    #[test]
    fn test_delete_tears_down_subtree() {
        let (root, middle, leaf) = chain();
        let weak_middle = middle.downgrade();
        drop(middle);

        let middle = root.node(0).unwrap();
        assert!(root.delete_node(&middle));
        assert!(leaf.parent().is_none());
        assert_eq!(middle.number_of_nodes(), 0);
        drop(middle);
        assert!(!weak_middle.is_alive());
    }

    #[test]
    fn test_replace_keeps_position() {
        let root = SceneNode::group();
        let a = SceneNode::group();
        let b = SceneNode::group();
        let c = SceneNode::group();
        root.add_node(&a).unwrap();
        root.add_node(&b).unwrap();
        let replacement = SceneNode::new(Properties::new());

        assert_eq!(root.replace_node(&a, &replacement), Ok(true));
        assert_eq!(root.children(), vec![replacement.clone(), b.clone()]);
        assert!(a.parent().is_none());
        assert_eq!(replacement.parent(), Some(root.clone()));

        assert_eq!(root.replace_node(&c, &a), Ok(false));
        assert!(matches!(
            root.replace_node(&b, &replacement),
            Err(SceneError::MultipleParents { .. })
        ));
    }

    #[test]
    fn test_remove_all_and_delete_all() {
        let root = SceneNode::group();
        let kids: Vec<_> = (0..3).map(|_| SceneNode::group()).collect();
        for kid in &kids {
            root.add_node(kid).unwrap();
        }
        let grandchild = SceneNode::group();
        kids[0].add_node(&grandchild).unwrap();

        root.remove_all_nodes();
        assert_eq!(root.number_of_nodes(), 0);
        assert!(kids.iter().all(|kid| kid.parent().is_none()));
        assert_eq!(grandchild.parent(), Some(kids[0].clone()));

        for kid in &kids {
            root.add_node(kid).unwrap();
        }
        root.delete_all_nodes();
        assert_eq!(root.number_of_nodes(), 0);
        assert!(grandchild.parent().is_none());
    }

    #[test]
    fn test_deep_clone_is_independent() {
        let (root, middle, _leaf) = chain();
        middle
            .payload_mut::<Transformation>()
            .unwrap()
            .translate(1.0, 0.0, 0.0);

        let copy = root.deep_clone();
        assert!(copy.parent().is_none());
        assert_eq!(copy.number_of_nodes(), 1);
        let copied_middle = copy.node(0).unwrap();
        assert!(!copied_middle.ptr_eq(&middle));
        assert_eq!(copied_middle.parent(), Some(copy.clone()));
        assert_eq!(copied_middle.node(0).unwrap().node_type(), NodeType::Geometry);

        copied_middle
            .payload_mut::<Transformation>()
            .unwrap()
            .translate(5.0, 0.0, 0.0);
        assert_relative_eq!(middle.payload::<Transformation>().unwrap().position().x, 1.0);
        copied_middle.remove_all_nodes();
        assert_eq!(middle.number_of_nodes(), 1);
    }

    #[test]
    fn test_payload_of_wrong_kind_is_none() {
        let node = SceneNode::group();
        assert!(node.payload::<Transformation>().is_none());
        assert!(node.payload_mut::<Geometry>().is_none());
        assert_eq!(node.to_string(), "SceneNode");
    }

    #[test]
    fn test_ancestors_and_root() {
        let (root, middle, leaf) = chain();
        assert_eq!(leaf.ancestors().collect::<Vec<_>>(), vec![middle.clone(), root.clone()]);
        assert_eq!(leaf.root(), root);
        assert!(root.is_ancestor_of(&leaf));
        assert!(!leaf.is_ancestor_of(&root));
        assert_eq!(root.root(), root);
    }
}
