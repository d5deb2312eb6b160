//! Traversal and mutation scenarios over whole trees


use super::SceneNode;

/// Builds the numbered tree used by most scenarios
///
/// ```text
///     0
///    / \
///   1   4
///  / \
/// 2   3
/// ```
fn numbered_tree() -> Vec<SceneNode> {
    let nodes: Vec<SceneNode> = (0..5).map(|_| SceneNode::group()).collect();
    nodes[0].add_node(&nodes[1]).unwrap();
    nodes[0].add_node(&nodes[4]).unwrap();
    nodes[1].add_node(&nodes[2]).unwrap();
    nodes[1].add_node(&nodes[3]).unwrap();
    nodes
}

/// Position of `node` in `nodes`
fn id_of(nodes: &[SceneNode], node: &SceneNode) -> usize {
    nodes
        .iter()
        .position(|known| known.ptr_eq(node))
        .expect("node belongs to the scenario")
}
