//! Branching conversation tree.
//!
//! Nodes live in an arena keyed by [`NodeId`]. Each node records its parent
//! and its ordered children, so parent lookup is a map access instead of a
//! search from the root. Exactly one node carries `is_current = true`, and
//! it is always the node [`Tree::current`] returns.

mod render;

pub use render::{FullView, PathView, TreeView};

use crate::TreeError;
use std::collections::HashMap;
use tracing::{debug, error};

/// Unique identifier for a tree node.
pub type NodeId = u64;

/// One recorded exchange plus its branch children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Unique node ID
    pub id: NodeId,

    /// What the user typed
    pub user_input: String,

    /// What the model answered
    pub llm_response: String,

    /// Distance from the root (root = 0)
    pub depth: usize,

    /// Parent node ID (None for root)
    pub parent: Option<NodeId>,

    /// Child node IDs in branch order
    pub children: Vec<NodeId>,

    /// Whether this node is the current position
    pub is_current: bool,
}

impl Node {
    fn new(id: NodeId, user_input: String, llm_response: String, depth: usize, parent: Option<NodeId>) -> Self {
        Self {
            id,
            user_input,
            llm_response,
            depth,
            parent,
            children: Vec::new(),
            is_current: false,
        }
    }

    /// Check if this is the root node.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// True when the node carries no exchange (only the root, normally).
    pub fn is_empty(&self) -> bool {
        self.user_input.is_empty() && self.llm_response.is_empty()
    }

    /// Check if this node has no branches below it.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// The conversation tree and its current pointer.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: HashMap<NodeId, Node>,
    root_id: NodeId,
    current_id: NodeId,
    next_id: NodeId,
}

impl Tree {
    /// Create a tree holding only an empty root, which is current.
    pub fn new() -> Self {
        let root_id = 0;
        let mut root = Node::new(root_id, String::new(), String::new(), 0, None);
        root.is_current = true;

        let mut nodes = HashMap::new();
        nodes.insert(root_id, root);

        Self {
            nodes,
            root_id,
            current_id: root_id,
            next_id: root_id + 1,
        }
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Get the root node.
    pub fn root(&self) -> &Node {
        self.nodes.get(&self.root_id).expect("Root node must exist")
    }

    /// Root node ID.
    pub fn root_id(&self) -> NodeId {
        self.root_id
    }

    /// Get the current node.
    pub fn current(&self) -> &Node {
        self.nodes
            .get(&self.current_id)
            .expect("Current node must exist")
    }

    /// Current node ID.
    pub fn current_id(&self) -> NodeId {
        self.current_id
    }

    /// Check whether `id` is the root.
    pub fn is_root(&self, id: NodeId) -> bool {
        id == self.root_id
    }

    /// Get children of a node, in branch order.
    pub fn children(&self, id: NodeId) -> Vec<&Node> {
        self.get(id)
            .map(|n| {
                n.children
                    .iter()
                    .filter_map(|child_id| self.get(*child_id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Total node count, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the tree holds nothing but the root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Number of nodes in the subtree rooted at `id`, `id` included.
    pub fn subtree_size(&self, id: NodeId) -> usize {
        self.subtree_ids(id).len()
    }

    /// Record a new exchange as a child of the current node and make it current.
    pub fn append(&mut self, user_input: impl Into<String>, llm_response: impl Into<String>) -> &Node {
        let parent = self.current_id;
        let id = self.insert_child(parent, user_input.into(), llm_response.into());
        self.set_current(id);

        debug!(node = id, parent = parent, "Appended exchange");

        self.current()
    }

    /// Move the current pointer to its parent.
    ///
    /// Returns `Ok(false)` without touching anything when already at the root.
    pub fn ascend(&mut self) -> Result<bool, TreeError> {
        if self.is_root(self.current_id) {
            return Ok(false);
        }

        let parent = self.parent_of(self.current_id)?;
        self.set_current(parent);

        Ok(true)
    }

    /// Move the current pointer to the child at `index` (0-based).
    pub fn descend(&mut self, index: usize) -> Result<&Node, TreeError> {
        let children = &self.current().children;
        if children.is_empty() {
            return Err(TreeError::NoChildren);
        }

        let Some(&child) = children.get(index) else {
            return Err(TreeError::IndexOutOfRange {
                index,
                len: children.len(),
            });
        };

        self.set_current(child);

        Ok(self.current())
    }

    /// Remove the current node and its whole subtree; its parent becomes current.
    pub fn delete_current(&mut self) -> Result<&Node, TreeError> {
        let target = self.current_id;
        if self.is_root(target) {
            return Err(TreeError::RootDeletion);
        }

        let parent = self.parent_of(target)?;
        let removed = self.subtree_ids(target);

        // Re-point before removal so `current` never dangles.
        self.set_current(parent);

        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.retain(|&child| child != target);
        }
        for id in &removed {
            self.nodes.remove(id);
        }

        debug!(node = target, removed = removed.len(), "Deleted branch");

        Ok(self.current())
    }

    /// Find the parent of a non-root node.
    pub fn parent_of(&self, id: NodeId) -> Result<NodeId, TreeError> {
        let node = self.get(id).ok_or_else(|| {
            TreeError::InternalConsistency(format!("node {id} is not in the tree"))
        })?;

        let parent = node.parent.filter(|p| {
            self.get(*p)
                .is_some_and(|parent| parent.children.contains(&id))
        });

        parent.ok_or_else(|| {
            error!(node = id, "Parent lookup failed");
            TreeError::InternalConsistency(format!("no parent found for node {id}"))
        })
    }

    /// Every node from the root down to the current node, inclusive.
    pub fn path_to_current(&self) -> Result<Vec<&Node>, TreeError> {
        let mut path = Vec::with_capacity(self.current().depth + 1);
        let mut id = self.current_id;

        loop {
            let node = self.get(id).ok_or_else(|| {
                TreeError::InternalConsistency(format!("path broken at node {id}"))
            })?;
            path.push(node);

            if self.is_root(id) {
                break;
            }
            if path.len() > self.nodes.len() {
                return Err(TreeError::InternalConsistency(
                    "cycle detected while walking to root".to_string(),
                ));
            }
            id = self.parent_of(id)?;
        }

        path.reverse();
        Ok(path)
    }

    /// Attach a child under `parent` without moving the current pointer.
    pub(crate) fn insert_child(&mut self, parent: NodeId, user_input: String, llm_response: String) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;

        let depth = self.nodes.get(&parent).map_or(0, |p| p.depth + 1);
        self.nodes
            .insert(id, Node::new(id, user_input, llm_response, depth, Some(parent)));

        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(id);
        }

        id
    }

    pub(crate) fn root_mut(&mut self) -> Option<&mut Node> {
        self.nodes.get_mut(&self.root_id)
    }

    /// Collect the IDs of a subtree, pre-order.
    fn subtree_ids(&self, id: NodeId) -> Vec<NodeId> {
        let mut ids = Vec::new();
        let mut stack = vec![id];

        while let Some(next) = stack.pop() {
            if let Some(node) = self.get(next) {
                ids.push(next);
                stack.extend(node.children.iter().rev().copied());
            }
        }

        ids
    }

    fn set_current(&mut self, id: NodeId) {
        if let Some(old) = self.nodes.get_mut(&self.current_id) {
            old.is_current = false;
        }
        if let Some(new) = self.nodes.get_mut(&id) {
            new.is_current = true;
        }
        self.current_id = id;
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}
