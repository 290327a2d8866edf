//! Single-file JSON snapshots of a conversation tree.
//!
//! The document is a nested `{user_input, llm_response, children}` object,
//! root included. Neither depth nor the current pointer is written; depth
//! follows from nesting and a loaded tree starts at its root.
//!
//! Each exchange in a linear conversation adds one level of nesting, so
//! reading and writing run through `serde_stacker`, and dropping a document
//! unwinds its children iteratively.

use crate::tree::{NodeId, Tree};
use crate::StorageError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

/// Persisted form of one node and its branches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotNode {
    /// What the user typed
    pub user_input: String,

    /// What the model answered
    pub llm_response: String,

    /// Branches in insertion order
    #[serde(default)]
    pub children: Vec<SnapshotNode>,
}

impl Drop for SnapshotNode {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

impl Tree {
    /// Build the nested document for the whole tree.
    pub fn to_snapshot(&self) -> SnapshotNode {
        // Post-order: a node is finished once all its children are.
        let mut finished: Vec<(NodeId, SnapshotNode)> = Vec::new();
        let mut stack: Vec<(NodeId, bool)> = vec![(self.root_id(), false)];

        while let Some((id, expanded)) = stack.pop() {
            let Some(node) = self.get(id) else {
                continue;
            };

            if !expanded {
                stack.push((id, true));
                stack.extend(node.children.iter().rev().map(|c| (*c, false)));
                continue;
            }

            let split = finished.len() - node.children.len();
            let children = finished.split_off(split).into_iter().map(|(_, n)| n).collect();

            finished.push((
                id,
                SnapshotNode {
                    user_input: node.user_input.clone(),
                    llm_response: node.llm_response.clone(),
                    children,
                },
            ));
        }

        finished.pop().map(|(_, n)| n).unwrap_or_default()
    }

    /// Rebuild a tree from a document. The root becomes current.
    pub fn from_snapshot(snapshot: &SnapshotNode) -> Self {
        let mut tree = Tree::new();
        let root_id = tree.root_id();

        if let Some(root) = tree.root_mut() {
            root.user_input = snapshot.user_input.clone();
            root.llm_response = snapshot.llm_response.clone();
        }

        let mut stack: Vec<(NodeId, &SnapshotNode)> = snapshot
            .children
            .iter()
            .rev()
            .map(|child| (root_id, child))
            .collect();

        while let Some((parent, doc)) = stack.pop() {
            let id = tree.insert_child(parent, doc.user_input.clone(), doc.llm_response.clone());
            stack.extend(doc.children.iter().rev().map(|child| (id, child)));
        }

        tree
    }
}

/// Write `tree` to `path` as pretty JSON with four-space indentation.
pub fn save_tree(tree: &Tree, path: &Path) -> Result<(), StorageError> {
    let snapshot = tree.to_snapshot();

    let file = File::create(path).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);

    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    snapshot.serialize(serde_stacker::Serializer::new(&mut serializer))?;

    writer.flush().map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), nodes = tree.len(), "Saved conversation");

    Ok(())
}

/// Read a tree previously written by [`save_tree`].
pub fn load_tree(path: &Path) -> Result<Tree, StorageError> {
    let file = File::open(path).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut deserializer = serde_json::Deserializer::from_reader(BufReader::new(file));
    deserializer.disable_recursion_limit();
    let snapshot = SnapshotNode::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
    deserializer.end()?;
    let tree = Tree::from_snapshot(&snapshot);

    debug!(path = %path.display(), nodes = tree.len(), "Loaded conversation");

    Ok(tree)
}
