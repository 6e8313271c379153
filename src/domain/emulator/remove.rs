use std::collections::VecDeque;

use tracing::{debug, instrument, trace};

use crate::domain::error::{FsError, FsResult, IllegalReason};
use crate::domain::node::{Node, NodeId, NodeKind};

use super::FileSystemEmulator;

/// What the delete-tree sweep does with one dequeued node.
enum Sweep {
    Remove,
    Descend(Vec<NodeId>),
    Skip,
}

impl FileSystemEmulator {
    /// Remove an empty directory that is neither the drive nor the current
    /// directory.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_directory(&mut self, path: &str) -> FsResult<()> {
        let dir = self.resolve_dir(path)?;
        if dir == self.drive {
            return Err(FsError::illegal(path, IllegalReason::DriveRoot));
        }
        if dir == self.current {
            return Err(FsError::illegal(path, IllegalReason::CurrentDirectory));
        }
        if self
            .node(dir)
            .and_then(Node::children)
            .is_some_and(|c| !c.is_empty())
        {
            return Err(FsError::NotEmpty {
                path: path.to_string(),
            });
        }
        self.remove_node(dir)
    }

    /// Remove a file or a link node.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_file(&mut self, path: &str) -> FsResult<()> {
        let id = self
            .resolve(path)
            .filter(|&id| self.node(id).is_some_and(|n| !n.is_dir()))
            .ok_or_else(|| FsError::not_found(path))?;
        self.remove_node(id)
    }

    /// Delete a directory and everything below it.
    ///
    /// Sweeps breadth-first, removing leaves and directories as they empty.
    /// A hard-linked descendant aborts the sweep with the subtree partially
    /// deleted.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_tree(&mut self, path: &str) -> FsResult<()> {
        let top = self.resolve_dir(path)?;
        if top == self.drive {
            return Err(FsError::illegal(path, IllegalReason::DriveRoot));
        }
        if self.arena.is_ancestor_or_self(top, self.current) {
            return Err(FsError::illegal(path, IllegalReason::CurrentDirectory));
        }
        if !self.hard_links(top).is_empty() {
            return Err(FsError::linked(self.absolute_path(top)));
        }

        let mut queue = VecDeque::new();
        while self.has_children(top) {
            queue.push_back(top);
            while let Some(next) = queue.pop_front() {
                match self.sweep_action(next, top) {
                    Sweep::Remove => self.remove_node(next)?,
                    Sweep::Descend(children) => queue.extend(children),
                    Sweep::Skip => {}
                }
            }
        }

        self.remove_node(top)
    }

    fn has_children(&self, dir: NodeId) -> bool {
        self.node(dir)
            .and_then(Node::children)
            .is_some_and(|c| !c.is_empty())
    }

    fn sweep_action(&self, id: NodeId, top: NodeId) -> Sweep {
        let Some(node) = self.node(id) else {
            // severed earlier in this sweep as a dynamic link
            trace!("skipping stale node");
            return Sweep::Skip;
        };
        match node.children() {
            None => Sweep::Remove,
            Some(children) if children.is_empty() => {
                if id == top {
                    Sweep::Skip
                } else {
                    Sweep::Remove
                }
            }
            Some(children) => Sweep::Descend(children.values().copied().collect()),
        }
    }

    /// Shared removal primitive.
    ///
    /// Hard-linked entities are refused. Dynamic links to the entity are
    /// severed first. A link node is unregistered from its target.
    /// Directories must already be empty.
    pub(super) fn remove_node(&mut self, id: NodeId) -> FsResult<()> {
        let Some(node) = self.arena.get_node(id) else {
            return Ok(());
        };

        match &node.kind {
            NodeKind::Directory { links, .. } | NodeKind::File { links } => {
                if links.is_pinned() {
                    return Err(FsError::linked(self.absolute_path(id)));
                }
                let severed = links.dynamic.clone();
                for link in severed {
                    debug!("severing dynamic link {:?}", self.node(link).map(|n| &n.name));
                    self.arena.remove_node(link);
                }
            }
            NodeKind::HardLink { target } | NodeKind::DynamicLink { target } => {
                let target = *target;
                if let Some(links) = self.arena.get_node_mut(target).and_then(|n| n.links_mut()) {
                    links.unregister(id);
                }
            }
        }

        self.arena.remove_node(id);
        Ok(())
    }
}
