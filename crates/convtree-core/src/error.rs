//! Core error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by tree navigation and mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    /// The root node can never be removed
    #[error("Cannot remove the root node.")]
    RootDeletion,

    /// `descend` was called on a leaf
    #[error("No child nodes to move down to.")]
    NoChildren,

    /// `descend` index outside `[0, len)`
    #[error("Invalid choice: index {index} is outside 0..{len}.")]
    IndexOutOfRange { index: usize, len: usize },

    /// A structural invariant was violated
    #[error("Internal consistency error: {0}")]
    InternalConsistency(String),
}

/// Errors that can occur while saving or loading snapshots.
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error during file operations
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::Io {
            path: PathBuf::from("/test/path.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("/test/path.json"));
    }

    #[test]
    fn test_index_error_mentions_bounds() {
        let err = TreeError::IndexOutOfRange { index: 5, len: 2 };
        let msg = err.to_string();
        assert!(msg.contains('5'));
        assert!(msg.contains('2'));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: StorageError = json_err.into();
        assert!(matches!(err, StorageError::Serialization(_)));
    }
}
