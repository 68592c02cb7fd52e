//! Scene graph: an arena of nodes linked parent-to-child by index.
//!
//! Each node owns a local transform (relative to its parent) and a world
//! transform that is only ever written by [`SceneGraph::propagate`]. A node is
//! added under a parent that already exists, so the graph is a forest and can
//! never contain a cycle.

use nalgebra::{Matrix4, Point3};

use crate::library::Drawable;
use crate::pick::PickId;
use crate::transform::Transform;

/// Index of a node inside its [`SceneGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub local: Matrix4<f32>,
    world: Matrix4<f32>,
    pub drawable: Option<Drawable>,
    pub pick_id: Option<PickId>,
    pub selected: bool,
    pub visible: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SceneNode {
    fn new(name: &str, local: Matrix4<f32>, parent: Option<NodeId>) -> Self {
        Self {
            name: name.to_string(),
            local,
            world: local,
            drawable: None,
            pick_id: None,
            selected: false,
            visible: true,
            parent,
            children: Vec::new(),
        }
    }

    /// World transform as of the last propagation
    pub fn world(&self) -> &Matrix4<f32> {
        &self.world
    }

    pub fn world_position(&self) -> Point3<f32> {
        Transform::origin(&self.world)
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Arena of scene nodes
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    roots: Vec<NodeId>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node under `parent` (or as a new root) and return its id.
    ///
    /// Returns `None`, leaving the graph untouched, when `parent` does not
    /// belong to this graph.
    pub fn add_node(
        &mut self,
        name: &str,
        parent: Option<NodeId>,
        local: Matrix4<f32>,
    ) -> Option<NodeId> {
        let id = NodeId(self.nodes.len());
        match parent {
            Some(p) => self.nodes.get_mut(p.0)?.children.push(id),
            None => self.roots.push(id),
        }
        self.nodes.push(SceneNode::new(name, local, parent));
        Some(id)
    }

    pub fn node(&self, id: NodeId) -> &SceneNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut SceneNode {
        &mut self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.name == name)
            .map(NodeId)
    }

    /// Iterate over every node in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }

    /// Recompute world transforms below `root`, parents before children.
    ///
    /// `base` stands in for the root's parent world transform.
    pub fn propagate(&mut self, root: NodeId, base: &Matrix4<f32>) {
        let mut stack = vec![(root, *base)];
        while let Some((id, parent_world)) = stack.pop() {
            let node = &mut self.nodes[id.0];
            node.world = parent_world * node.local;
            let world = node.world;
            // Reverse so the first child is visited first
            stack.extend(node.children.iter().rev().map(|&child| (child, world)));
        }
    }

    /// Propagate every root from the identity
    pub fn update_transforms(&mut self) {
        let identity = Matrix4::identity();
        for i in 0..self.roots.len() {
            let root = self.roots[i];
            self.propagate(root, &identity);
        }
    }

    /// Clear the selection flag on every node
    pub fn clear_selection(&mut self) {
        for node in &mut self.nodes {
            node.selected = false;
        }
    }

    /// Visit visible nodes in pre-order, skipping hidden subtrees
    pub fn visible_nodes(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.0];
            if !node.visible {
                continue;
            }
            order.push(id);
            stack.extend(node.children.iter().rev().copied());
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;
    use std::f32::consts::FRAC_PI_4;

    fn chain() -> (SceneGraph, [NodeId; 3], [Matrix4<f32>; 3]) {
        let locals = [
            Transform::translation_matrix(&Vector3::new(1.0, 0.0, 0.0)),
            Transform::rotate(&Matrix4::identity(), FRAC_PI_4, &Vector3::y()),
            Transform::translation_matrix(&Vector3::new(0.0, 2.0, -3.0)),
        ];
        let mut graph = SceneGraph::new();
        let a = graph.add_node("a", None, locals[0]).unwrap();
        let b = graph.add_node("b", Some(a), locals[1]).unwrap();
        let c = graph.add_node("c", Some(b), locals[2]).unwrap();
        (graph, [a, b, c], locals)
    }

    #[test]
    fn test_world_is_product_of_ancestor_locals() {
        let (mut graph, [a, b, c], [la, lb, lc]) = chain();
        graph.update_transforms();

        assert!((graph.node(a).world() - la).norm() < 1e-6);
        assert!((graph.node(b).world() - la * lb).norm() < 1e-6);
        assert!((graph.node(c).world() - la * lb * lc).norm() < 1e-6);
    }

    #[test]
    fn test_propagate_uses_base() {
        let (mut graph, [a, _, c], [la, lb, lc]) = chain();
        let base = Transform::translation_matrix(&Vector3::new(0.0, -5.0, 0.0));
        graph.propagate(a, &base);
        assert!((graph.node(c).world() - base * la * lb * lc).norm() < 1e-6);
    }

    #[test]
    fn test_local_edit_reaches_descendants() {
        let (mut graph, [a, _, c], _) = chain();
        graph.update_transforms();
        let before = graph.node(c).world_position();

        let local = graph.node(a).local;
        graph.node_mut(a).local = Transform::translate(&local, &Vector3::new(0.5, 0.0, 0.0));
        graph.update_transforms();

        let after = graph.node(c).world_position();
        assert!((after - before - Vector3::new(0.5, 0.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_siblings_and_roots() {
        let mut graph = SceneGraph::new();
        let root = graph.add_node("root", None, Matrix4::identity()).unwrap();
        let left = graph.add_node("left", Some(root), Matrix4::identity()).unwrap();
        let right = graph.add_node("right", Some(root), Matrix4::identity()).unwrap();
        let other = graph.add_node("other", None, Matrix4::identity()).unwrap();

        assert_eq!(graph.roots(), &[root, other]);
        assert_eq!(graph.node(root).children(), &[left, right]);
        assert_eq!(graph.node(right).parent(), Some(root));
        assert_eq!(graph.find("right"), Some(right));
        assert_eq!(graph.visible_nodes(), vec![root, left, right, other]);

        graph.node_mut(root).visible = false;
        assert_eq!(graph.visible_nodes(), vec![other]);
    }

    #[test]
    fn test_foreign_parent_is_rejected() {
        let (big, [_, _, c], _) = chain();
        assert_eq!(big.len(), 3);

        let mut small = SceneGraph::new();
        let root = small.add_node("root", None, Matrix4::identity()).unwrap();
        assert_eq!(small.add_node("stray", Some(c), Matrix4::identity()), None);
        assert_eq!(small.len(), 1);
        assert!(small.node(root).children().is_empty());
        assert_eq!(small.find("stray"), None);
    }
}
