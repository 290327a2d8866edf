//! Convtree Core
//!
//! This crate provides the data model behind the convtree shell:
//! - A branching conversation tree with a single current pointer
//! - Lazy line-oriented views of the tree for display
//! - JSON snapshots for saving and restoring a tree
//! - Shell configuration loaded from YAML

pub mod config;
mod error;
pub mod storage;
pub mod tree;

pub use config::{ProviderConfig, ProviderKind, ShellConfig};
pub use error::{StorageError, TreeError};
pub use storage::{load_tree, save_tree, SnapshotNode};
pub use tree::{FullView, Node, NodeId, PathView, Tree, TreeView};
