//! Tree engine: one rooted tree plus a current-directory cursor
//!
//! All operations are synchronous. Paths are either absolute (`C:\...`) or
//! relative to the current directory.

mod create;
mod remove;
mod transfer;

use tracing::{debug, instrument};

use crate::domain::arena::NodeArena;
use crate::domain::error::{FsError, FsResult};
use crate::domain::node::{Node, NodeId, NodeKind, NodeKindTag};
use crate::domain::path::{self, DRIVE, SEPARATOR};

/// In-memory DOS-like file system with hard and dynamic links.
#[derive(Debug)]
pub struct FileSystemEmulator {
    arena: NodeArena,
    /// The `C:` directory, child of the arena's synthetic super-root.
    drive: NodeId,
    /// Base for relative paths.
    current: NodeId,
}

impl Default for FileSystemEmulator {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystemEmulator {
    pub fn new() -> Self {
        let mut arena = NodeArena::new();
        let drive = arena.insert_node(DRIVE.to_string(), NodeKind::directory(), arena.root());
        Self {
            arena,
            drive,
            current: drive,
        }
    }

    /// The drive directory (`C:`).
    pub fn drive(&self) -> NodeId {
        self.drive
    }

    pub fn current_dir(&self) -> NodeId {
        self.current
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.arena.get_node(id)
    }

    /// Number of nodes in the tree, drive included.
    pub fn len(&self) -> usize {
        self.arena.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn arena(&self) -> &NodeArena {
        &self.arena
    }

    /// Resolve a path to a node; `None` when any segment is missing.
    ///
    /// The empty path is the current directory. A non-directory only
    /// matches as the final segment.
    #[instrument(level = "trace", skip(self))]
    pub fn resolve(&self, path: &str) -> Option<NodeId> {
        if path.is_empty() {
            return Some(self.current);
        }

        let mut current = if path::is_absolute(path) {
            self.arena.root()
        } else {
            self.current
        };

        let segments = path::split_path(path);
        let last = segments.len() - 1;
        for (i, segment) in segments.into_iter().enumerate() {
            let child = self.arena.child(current, segment)?;
            if i != last && !self.arena.get_node(child)?.is_dir() {
                return None;
            }
            current = child;
        }
        Some(current)
    }

    pub fn kind_of(&self, path: &str) -> Option<NodeKindTag> {
        self.resolve(path)
            .and_then(|id| self.node(id))
            .map(|n| n.kind.tag())
    }

    /// Canonical absolute path of a live node, e.g. `C:\Dir1\file1.txt`.
    pub fn absolute_path(&self, id: NodeId) -> String {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current.and_then(|i| self.arena.get_node(i)) {
            if node.parent.is_none() {
                break;
            }
            names.push(node.name.as_str());
            current = node.parent;
        }
        names.reverse();
        let separator = SEPARATOR.to_string();
        names.join(separator.as_str())
    }

    /// Absolute form of `path` interpreted relative to directory `dir`.
    /// Already-absolute input is returned unchanged.
    pub fn to_absolute_path(&self, path: &str, dir: NodeId) -> String {
        if path::is_absolute(path) {
            return path.to_string();
        }
        path::join(&self.absolute_path(dir), path)
    }

    /// Target entity of a link node.
    pub fn link_target(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.link_target()
    }

    /// Hard links registered against an entity.
    pub fn hard_links(&self, id: NodeId) -> &[NodeId] {
        self.node(id)
            .and_then(Node::links)
            .map(|l| l.hard.as_slice())
            .unwrap_or_default()
    }

    /// Dynamic links registered against an entity.
    pub fn dynamic_links(&self, id: NodeId) -> &[NodeId] {
        self.node(id)
            .and_then(Node::links)
            .map(|l| l.dynamic.as_slice())
            .unwrap_or_default()
    }

    #[instrument(level = "debug", skip(self))]
    pub fn change_directory(&mut self, path: &str) -> FsResult<()> {
        let dir = self.resolve_dir(path)?;
        self.current = dir;
        debug!("current directory: {}", self.absolute_path(dir));
        Ok(())
    }

    fn resolve_existing(&self, path: &str) -> FsResult<NodeId> {
        self.resolve(path).ok_or_else(|| FsError::not_found(path))
    }

    /// Resolve `path` and require a directory; anything else is not found.
    fn resolve_dir(&self, path: &str) -> FsResult<NodeId> {
        self.resolve(path)
            .filter(|&id| self.node(id).is_some_and(Node::is_dir))
            .ok_or_else(|| FsError::not_found(path))
    }

    fn tag(&self, id: NodeId) -> Option<NodeKindTag> {
        self.node(id).map(|n| n.kind.tag())
    }

    /// True if the entity or anything below it carries a hard link.
    fn is_pinned(&self, id: NodeId) -> bool {
        self.arena
            .iter_from(id)
            .any(|(_, node, _)| node.links().is_some_and(|l| l.is_pinned()))
    }
}
