// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read-only snapshot of the floating tree.
//!
//! The tree registry itself lives outside this crate. Hosts hand the
//! controllers a [`FloatingTree`] snapshot of the registered nodes, and the
//! controllers only ask questions of it: children of a node, its parent,
//! whether it is nested.
//!
//! ```
//! use understory_floating::tree::{FloatingTree, NodeId, TreeNode};
//!
//! let tree: FloatingTree<u32> = FloatingTree::from_nodes(vec![
//!     TreeNode::new(NodeId(1), None),
//!     TreeNode::new(NodeId(2), Some(NodeId(1))),
//!     TreeNode::new(NodeId(3), Some(NodeId(2))),
//! ]);
//! let ids: Vec<_> = tree.children(NodeId(1)).iter().map(|n| n.id).collect();
//! assert_eq!(ids, vec![NodeId(2), NodeId(3)]);
//! assert!(tree.is_nested(NodeId(2)));
//! ```

use alloc::vec::Vec;

use crate::context::FloatingContext;

/// Identifier of a floating element in the tree registry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// A registered floating element.
#[derive(Clone, Debug)]
pub struct TreeNode<E> {
    /// This node's id.
    pub id: NodeId,
    /// Parent node, or `None` for a root.
    pub parent_id: Option<NodeId>,
    /// Context of the node's floating element, once mounted.
    pub context: Option<FloatingContext<E>>,
}

impl<E> TreeNode<E> {
    /// A node without a context.
    pub fn new(id: NodeId, parent_id: Option<NodeId>) -> Self {
        Self {
            id,
            parent_id,
            context: None,
        }
    }

    /// Attach the node's context.
    pub fn with_context(mut self, context: FloatingContext<E>) -> Self {
        self.context = Some(context);
        self
    }

    /// Whether the node's floating element is open.
    pub fn is_open(&self) -> bool {
        self.context.as_ref().is_some_and(|c| c.open)
    }
}

/// All transitive descendants of `id`, nearest generation first.
///
/// Nodes within a generation keep their order in `nodes`.
pub fn get_children<E>(nodes: &[TreeNode<E>], id: NodeId) -> Vec<&TreeNode<E>> {
    let mut all: Vec<&TreeNode<E>> = nodes
        .iter()
        .filter(|n| n.parent_id == Some(id) && n.id != id)
        .collect();
    let mut start = 0;
    while start < all.len() {
        let end = all.len();
        for node in nodes {
            let Some(parent) = node.parent_id else {
                continue;
            };
            // Skip anything already collected so a malformed cycle terminates.
            if node.id == id || all.iter().any(|c| c.id == node.id) {
                continue;
            }
            if all[start..end].iter().any(|c| c.id == parent) {
                all.push(node);
            }
        }
        start = end;
    }
    all
}

/// Immutable snapshot of the registry's nodes.
#[derive(Clone, Debug)]
pub struct FloatingTree<E> {
    nodes: Vec<TreeNode<E>>,
}

impl<E> Default for FloatingTree<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> FloatingTree<E> {
    /// An empty tree.
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// A tree over `nodes`.
    pub fn from_nodes(nodes: Vec<TreeNode<E>>) -> Self {
        Self { nodes }
    }

    /// All nodes, in registration order.
    pub fn nodes(&self) -> &[TreeNode<E>] {
        &self.nodes
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Option<&TreeNode<E>> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// The parent node of `id`, if both are registered.
    pub fn parent_of(&self, id: NodeId) -> Option<&TreeNode<E>> {
        let parent = self.node(id)?.parent_id?;
        self.node(parent)
    }

    /// True if `id` has a parent.
    pub fn is_nested(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|n| n.parent_id.is_some())
    }

    /// See [`get_children`].
    pub fn children(&self, id: NodeId) -> Vec<&TreeNode<E>> {
        get_children(&self.nodes, id)
    }

    /// True if any node lists `id` as its parent.
    pub fn has_descendants(&self, id: NodeId) -> bool {
        self.nodes
            .iter()
            .any(|n| n.parent_id == Some(id) && n.id != id)
    }

    /// True if any descendant of `id` is open.
    pub fn has_open_descendant(&self, id: NodeId) -> bool {
        self.children(id).iter().any(|n| n.is_open())
    }
}
