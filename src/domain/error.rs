//! Domain-level errors (no external dependencies)

use std::fmt;

use thiserror::Error;

use crate::domain::node::NodeKindTag;

/// Why an otherwise valid node may not be the target of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalReason {
    /// The drive directory (`C:`) can never be removed or moved.
    DriveRoot,
    /// The current directory, or one of its ancestors.
    CurrentDirectory,
    /// Destination lies inside the subtree being moved.
    OwnSubtree,
    /// Links may only target directories and files.
    LinkSource,
}

impl fmt::Display for IllegalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IllegalReason::DriveRoot => write!(f, "it is the drive root"),
            IllegalReason::CurrentDirectory => write!(f, "it holds the current directory"),
            IllegalReason::OwnSubtree => write!(f, "destination is inside the source subtree"),
            IllegalReason::LinkSource => write!(f, "link source is itself a link"),
        }
    }
}

/// Domain errors: the single failure taxonomy of the tree engine.
///
/// Every mutator either completes or returns one of these. `delete_tree`
/// is the only operation that may fail after partially mutating the tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FsError {
    #[error("path not found: {path}")]
    NotFound { path: String },

    #[error("cannot create {requested} '{name}': a {existing} with the same name exists")]
    AlreadyExistsConflict {
        name: String,
        requested: NodeKindTag,
        existing: NodeKindTag,
    },

    #[error("illegal target {path}: {reason}")]
    IllegalTarget { path: String, reason: IllegalReason },

    #[error("directory not empty: {path}")]
    NotEmpty { path: String },

    #[error("entity has attached hard link: {path}")]
    LinkedEntity { path: String },
}

impl FsError {
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn illegal(path: impl Into<String>, reason: IllegalReason) -> Self {
        Self::IllegalTarget {
            path: path.into(),
            reason,
        }
    }

    pub fn linked(path: impl Into<String>) -> Self {
        Self::LinkedEntity { path: path.into() }
    }
}

/// Result type for tree engine operations.
pub type FsResult<T> = Result<T, FsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_message_names_both_kinds() {
        let err = FsError::AlreadyExistsConflict {
            name: "file1".into(),
            requested: NodeKindTag::Directory,
            existing: NodeKindTag::File,
        };
        assert_eq!(
            err.to_string(),
            "cannot create directory 'file1': a file with the same name exists"
        );
    }

    #[test]
    fn illegal_target_message_includes_reason() {
        let err = FsError::illegal("C:", IllegalReason::DriveRoot);
        assert_eq!(err.to_string(), "illegal target C:: it is the drive root");
    }
}
