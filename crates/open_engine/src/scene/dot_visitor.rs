//! Graphviz export of a scene

use super::{
    Geometry, MeshInstance, ModelInstance, Properties, SceneNode, SceneNodeVisitor, VisitResult,
};
use std::collections::{BTreeMap, HashMap};
use std::io;

/// Renders a scene as a `dot` digraph
///
/// Node ids are assigned on first sight, starting at 1, and stay stable for
/// the lifetime of the visitor.
#[derive(Debug)]
pub struct DotVisitor {
    id: String,
    next_id: u32,
    names: HashMap<SceneNode, u32>,
    dot: String,
}

impl Default for DotVisitor {
    fn default() -> Self {
        Self::named("")
    }
}

impl DotVisitor {
    /// Unnamed graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Graph called `id`
    pub fn named(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            next_id: 1,
            names: HashMap::new(),
            dot: String::new(),
        }
    }

    /// Dot source for the scene below and including `root`
    pub fn to_dot(&mut self, root: &SceneNode) -> String {
        self.dot = format!("digraph {} {{\n", self.id);
        if let Err(err) = root.accept(self) {
            log::warn!("Dot export stopped early: {err}");
        }
        self.dot.push('}');
        std::mem::take(&mut self.dot)
    }

    /// Write the dot source for `root` to `out`
    pub fn write(&mut self, root: &SceneNode, out: &mut impl io::Write) -> io::Result<()> {
        let dot = self.to_dot(root);
        out.write_all(dot.as_bytes())
    }

    /// Id of `node`, assigning the next free one on first use
    pub fn node_id(&mut self, node: &SceneNode) -> u32 {
        if let Some(id) = self.names.get(node) {
            return *id;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.names.insert(node.clone(), id);
        id
    }

    /// Emit `node` with a label, its edges, then its subtree
    pub fn visit_labelled(&mut self, node: &SceneNode, label: &str) -> VisitResult {
        let mut options = BTreeMap::new();
        options.insert("label", label.to_string());
        self.visit_with_options(node, &options)
    }

    /// Emit `node` with arbitrary dot attributes, its edges, then its subtree
    pub fn visit_with_options(
        &mut self,
        node: &SceneNode,
        options: &BTreeMap<&str, String>,
    ) -> VisitResult {
        let id = self.node_id(node);
        let attributes: String = options
            .iter()
            .map(|(key, value)| format!("{key}=\"{value}\" "))
            .collect();
        self.dot.push_str(&format!("{{{id} [{attributes}]}}"));

        let children = node.children();
        if !children.is_empty() {
            let targets: String = children
                .iter()
                .map(|child| format!("{}; ", self.node_id(child)))
                .collect();
            self.dot.push_str(&format!(" -> {{ {targets}}} "));
        }
        self.dot.push_str(";\n");
        node.visit_sub_nodes(self)
    }
}

impl SceneNodeVisitor for DotVisitor {
    fn default_visit_node(&mut self, node: &SceneNode) -> VisitResult {
        let label = node.type_name();
        self.visit_labelled(node, label)
    }

    fn visit_scene_node(&mut self, node: &SceneNode) -> VisitResult {
        self.visit_labelled(node, "Scene node")
    }

    fn visit_transformation_node(&mut self, node: &SceneNode) -> VisitResult {
        self.visit_labelled(node, "Transformation")
    }

    fn visit_geometry_node(&mut self, node: &SceneNode) -> VisitResult {
        let faces = node.payload::<Geometry>().map_or(0, |g| g.faces.len());
        self.visit_labelled(node, &format!("Geometry\\nFaces: {faces}"))
    }

    fn visit_mesh_node(&mut self, node: &SceneNode) -> VisitResult {
        let triangles = node
            .payload::<MeshInstance>()
            .map_or(0, |m| m.mesh.triangle_count());
        self.visit_labelled(node, &format!("Mesh\\nTriangles: {triangles}"))
    }

    fn visit_model_node(&mut self, node: &SceneNode) -> VisitResult {
        let parts = node.payload::<ModelInstance>().map_or(0, |m| m.parts.len());
        self.visit_labelled(node, &format!("Model\\nParts: {parts}"))
    }

    fn visit_property_node(&mut self, node: &SceneNode) -> VisitResult {
        let keys = node
            .payload::<Properties>()
            .map(|p| p.keys().collect::<Vec<_>>().join(", "))
            .unwrap_or_default();
        self.visit_labelled(node, &format!("Properties\\n{keys}"))
    }
}
