use tracing::{debug, instrument};

use crate::domain::error::{FsError, FsResult, IllegalReason};
use crate::domain::node::{NodeId, NodeKind, NodeKindTag};
use crate::domain::path;

use super::FileSystemEmulator;

/// Read-only snapshot of a subtree to copy, with link targets already
/// resolved from their encoded names.
#[derive(Debug)]
enum CopyPlan {
    Directory { name: String, children: Vec<CopyPlan> },
    File { name: String },
    Link { name: String, tag: NodeKindTag, target: NodeId },
}

impl FileSystemEmulator {
    /// Duplicate the subtree at `source` into directory `dest`.
    ///
    /// Copied links are registered against the targets their names encode,
    /// never against copies of them.
    #[instrument(level = "debug", skip(self))]
    pub fn copy(&mut self, source: &str, dest: &str) -> FsResult<()> {
        let src = self.resolve_existing(source)?;
        let dst = self.resolve_dir(dest)?;
        self.ensure_free_name(src, dst)?;

        let plan = self.plan_copy(src)?;
        let copied = self.materialize(plan, dst);
        debug!("copied to {}", self.absolute_path(copied));
        Ok(())
    }

    /// Relocate `source` under directory `dest`, rewriting every dynamic link
    /// that tracks the moved subtree.
    ///
    /// Moving onto itself, into its current parent, or moving the drive is a
    /// silent no-op.
    #[instrument(level = "debug", skip(self))]
    pub fn move_entity(&mut self, source: &str, dest: &str) -> FsResult<()> {
        let src = self.resolve_existing(source)?;
        let dst = self.resolve_dir(dest)?;

        if src == dst || src == self.drive {
            debug!("nothing to move");
            return Ok(());
        }
        if self.node(src).and_then(|n| n.parent) == Some(dst) {
            debug!("already in destination");
            return Ok(());
        }
        if src == self.current {
            return Err(FsError::illegal(source, IllegalReason::CurrentDirectory));
        }
        if self.arena.is_ancestor_or_self(src, dst) {
            return Err(FsError::illegal(dest, IllegalReason::OwnSubtree));
        }
        if self.is_pinned(src) {
            return Err(FsError::linked(self.absolute_path(src)));
        }
        self.ensure_free_name(src, dst)?;
        let rewrites = self.plan_link_rewrites(src, dst)?;

        self.arena.detach(src);
        self.arena.attach(src, dst);
        for (link, name) in rewrites {
            debug!("rewriting dynamic link to {name}");
            self.arena.rename(link, name);
        }
        Ok(())
    }

    fn ensure_free_name(&self, src: NodeId, dst: NodeId) -> FsResult<()> {
        let Some(node) = self.node(src) else {
            return Ok(());
        };
        match self.arena.child(dst, &node.name).and_then(|e| self.tag(e)) {
            Some(existing) => Err(FsError::AlreadyExistsConflict {
                name: node.name.clone(),
                requested: node.kind.tag(),
                existing,
            }),
            None => Ok(()),
        }
    }

    fn plan_copy(&self, id: NodeId) -> FsResult<CopyPlan> {
        let node = self.node(id).ok_or_else(|| FsError::not_found(self.absolute_path(id)))?;
        let name = node.name.clone();
        let plan = match &node.kind {
            NodeKind::Directory { children, .. } => CopyPlan::Directory {
                name,
                children: children
                    .values()
                    .map(|&child| self.plan_copy(child))
                    .collect::<FsResult<Vec<_>>>()?,
            },
            NodeKind::File { .. } => CopyPlan::File { name },
            NodeKind::HardLink { .. } | NodeKind::DynamicLink { .. } => {
                let target_path =
                    path::link_target_path(&name).ok_or_else(|| FsError::not_found(&name))?;
                let target = self
                    .resolve(target_path)
                    .ok_or_else(|| FsError::not_found(target_path))?;
                CopyPlan::Link {
                    tag: node.kind.tag(),
                    name,
                    target,
                }
            }
        };
        Ok(plan)
    }

    fn materialize(&mut self, plan: CopyPlan, dest: NodeId) -> NodeId {
        match plan {
            CopyPlan::Directory { name, children } => {
                let dir = self.arena.insert_node(name, NodeKind::directory(), dest);
                for child in children {
                    self.materialize(child, dir);
                }
                dir
            }
            CopyPlan::File { name } => self.arena.insert_node(name, NodeKind::file(), dest),
            CopyPlan::Link { name, tag, target } => {
                let kind = match tag {
                    NodeKindTag::HardLink => NodeKind::HardLink { target },
                    _ => NodeKind::DynamicLink { target },
                };
                let link = self.arena.insert_node(name, kind, dest);
                if let Some(links) = self.arena.get_node_mut(target).and_then(|n| n.links_mut()) {
                    links.register(tag, link);
                }
                link
            }
        }
    }

    /// New encoded names for every dynamic link registered against `src` or
    /// anything below it, as they will read once `src` sits under `dst`.
    ///
    /// Fails if a rewritten name is already taken by another node in the
    /// link's directory; nothing has been mutated at that point.
    fn plan_link_rewrites(&self, src: NodeId, dst: NodeId) -> FsResult<Vec<(NodeId, String)>> {
        let old_prefix = self.absolute_path(src);
        let name = self.node(src).map(|n| n.name.as_str()).unwrap_or_default();
        let new_prefix = path::join(&self.absolute_path(dst), name);

        let mut rewrites = Vec::new();
        for (entity, node, _) in self.arena.iter_from(src) {
            let Some(links) = node.links().filter(|l| !l.dynamic.is_empty()) else {
                continue;
            };
            let absolute = self.absolute_path(entity);
            let tail = absolute.strip_prefix(old_prefix.as_str()).unwrap_or_default();
            let Some(new_name) =
                path::encode_link_name(NodeKindTag::DynamicLink, &format!("{new_prefix}{tail}"))
            else {
                continue;
            };

            for &link in &links.dynamic {
                let parent = self.node(link).and_then(|n| n.parent);
                let taken = parent
                    .and_then(|p| self.arena.child(p, &new_name))
                    .filter(|&other| other != link);
                if let Some(existing) = taken.and_then(|other| self.tag(other)) {
                    return Err(FsError::AlreadyExistsConflict {
                        name: new_name,
                        requested: NodeKindTag::DynamicLink,
                        existing,
                    });
                }
                rewrites.push((link, new_name.clone()));
            }
        }
        Ok(rewrites)
    }
}
