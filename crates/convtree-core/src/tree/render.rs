//! Lazy line views over a [`Tree`].
//!
//! Every view walks the tree with an explicit stack and yields display lines
//! on demand. Views borrow the tree, so a fresh one can be taken at any time.

use super::{Node, NodeId, Tree};
use crate::TreeError;

fn marker(node: &Node) -> &'static str {
    if node.is_current {
        "*"
    } else {
        " "
    }
}

impl Tree {
    /// Indented pre-order listing of every exchange below `start` (root by default).
    pub fn render_full(&self, start: Option<NodeId>) -> FullView<'_> {
        let start = start.unwrap_or(self.root_id);
        let base_depth = self.get(start).map_or(0, |n| n.depth);

        FullView {
            tree: self,
            stack: vec![start],
            base_depth,
            pending: None,
        }
    }

    /// Box-drawing listing of every exchange below `start` (root by default).
    pub fn render_tree(&self, start: Option<NodeId>) -> TreeView<'_> {
        let start = start.unwrap_or(self.root_id);

        TreeView {
            tree: self,
            stack: vec![TreeEntry {
                id: start,
                prefix: String::new(),
                is_last: None,
            }],
            pending: None,
        }
    }

    /// The exchanges from the root down to the current node.
    pub fn render_path(&self) -> Result<PathView<'_>, TreeError> {
        Ok(PathView {
            nodes: self.path_to_current()?.into_iter(),
            pending: None,
        })
    }

    /// One-line previews of the current node's branches, numbered from 1.
    pub fn child_previews(&self) -> Vec<String> {
        self.children(self.current_id)
            .iter()
            .enumerate()
            .map(|(i, child)| format!("{}: {}", i + 1, child.user_input))
            .collect()
    }
}

/// Lines produced by [`Tree::render_full`].
#[derive(Debug, Clone)]
pub struct FullView<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
    base_depth: usize,
    pending: Option<String>,
}

impl Iterator for FullView<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if let Some(line) = self.pending.take() {
            return Some(line);
        }

        while let Some(id) = self.stack.pop() {
            let Some(node) = self.tree.get(id) else {
                continue;
            };
            self.stack.extend(node.children.iter().rev().copied());

            if node.is_empty() {
                continue;
            }

            let indent = "  ".repeat(node.depth.saturating_sub(self.base_depth));
            self.pending = Some(format!("{indent}  LLM: {}", node.llm_response));
            return Some(format!("{indent}{} User: {}", marker(node), node.user_input));
        }

        None
    }
}

#[derive(Debug, Clone)]
struct TreeEntry {
    id: NodeId,
    prefix: String,
    /// `None` for the node the view starts from
    is_last: Option<bool>,
}

/// Lines produced by [`Tree::render_tree`].
#[derive(Debug, Clone)]
pub struct TreeView<'a> {
    tree: &'a Tree,
    stack: Vec<TreeEntry>,
    pending: Option<String>,
}

impl Iterator for TreeView<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if let Some(line) = self.pending.take() {
            return Some(line);
        }

        while let Some(entry) = self.stack.pop() {
            let Some(node) = self.tree.get(entry.id) else {
                continue;
            };

            let (connector, continuation) = match entry.is_last {
                None => ("", ""),
                Some(true) => ("└── ", "    "),
                Some(false) => ("├── ", "│   "),
            };

            let child_prefix = format!("{}{}", entry.prefix, continuation);
            let count = node.children.len();
            for (i, child) in node.children.iter().enumerate().rev() {
                self.stack.push(TreeEntry {
                    id: *child,
                    prefix: child_prefix.clone(),
                    is_last: Some(i + 1 == count),
                });
            }

            if node.is_empty() {
                continue;
            }

            self.pending = Some(format!("{child_prefix}  LLM: {}", node.llm_response));
            return Some(format!(
                "{}{}{}User: {}",
                entry.prefix,
                connector,
                marker(node),
                node.user_input
            ));
        }

        None
    }
}

/// Lines produced by [`Tree::render_path`].
#[derive(Debug, Clone)]
pub struct PathView<'a> {
    nodes: std::vec::IntoIter<&'a Node>,
    pending: Option<String>,
}

impl Iterator for PathView<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if let Some(line) = self.pending.take() {
            return Some(line);
        }

        for node in self.nodes.by_ref() {
            if node.is_empty() {
                continue;
            }
            self.pending = Some(format!("  LLM: {}", node.llm_response));
            return Some(format!("{}User: {}", marker(node), node.user_input));
        }

        None
    }
}
