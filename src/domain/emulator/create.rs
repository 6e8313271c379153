use tracing::{debug, instrument};

use crate::domain::error::{FsError, FsResult, IllegalReason};
use crate::domain::node::{NodeId, NodeKind, NodeKindTag};
use crate::domain::path;

use super::FileSystemEmulator;

impl FileSystemEmulator {
    /// Create a directory. The parent portion of `path` must already exist.
    #[instrument(level = "debug", skip(self))]
    pub fn make_directory(&mut self, path: &str) -> FsResult<()> {
        self.make_node(path::parent_path(path), path::basename(path), NodeKind::directory())
            .map(|_| ())
    }

    /// Create a file. The parent portion of `path` must already exist.
    #[instrument(level = "debug", skip(self))]
    pub fn make_file(&mut self, path: &str) -> FsResult<()> {
        self.make_node(path::parent_path(path), path::basename(path), NodeKind::file())
            .map(|_| ())
    }

    /// Place a hard link to `source` inside directory `dest`.
    #[instrument(level = "debug", skip(self))]
    pub fn make_hard_link(&mut self, source: &str, dest: &str) -> FsResult<()> {
        self.make_link(source, dest, NodeKindTag::HardLink)
    }

    /// Place a dynamic link to `source` inside directory `dest`.
    #[instrument(level = "debug", skip(self))]
    pub fn make_dynamic_link(&mut self, source: &str, dest: &str) -> FsResult<()> {
        self.make_link(source, dest, NodeKindTag::DynamicLink)
    }

    /// Insert `name` under the directory at `parent`.
    ///
    /// Returns `Ok(None)` when a node of the same name and kind is already
    /// there; a same-named node of any other kind is a conflict.
    fn make_node(&mut self, parent: &str, name: &str, kind: NodeKind) -> FsResult<Option<NodeId>> {
        let dir = self.resolve_dir(parent)?;
        if name.is_empty() {
            return Err(FsError::not_found(path::join(parent, name)));
        }

        if let Some(existing) = self.arena.child(dir, name) {
            let existing = self.tag(existing).ok_or_else(|| FsError::not_found(name))?;
            let requested = kind.tag();
            if existing == requested {
                debug!("{requested} '{name}' already exists, nothing to do");
                return Ok(None);
            }
            return Err(FsError::AlreadyExistsConflict {
                name: name.to_string(),
                requested,
                existing,
            });
        }

        Ok(Some(self.arena.insert_node(name.to_string(), kind, dir)))
    }

    fn make_link(&mut self, source: &str, dest: &str, tag: NodeKindTag) -> FsResult<()> {
        let target = self.resolve_existing(source)?;
        if self.tag(target).is_some_and(NodeKindTag::is_link) {
            return Err(FsError::illegal(source, IllegalReason::LinkSource));
        }

        let absolute = self.absolute_path(target);
        let (Some(name), Some(kind)) = (
            path::encode_link_name(tag, &absolute),
            NodeKind::link(tag, target),
        ) else {
            return Err(FsError::not_found(source));
        };

        if let Some(link) = self.make_node(dest, &name, kind)? {
            if let Some(links) = self.arena.get_node_mut(target).and_then(|n| n.links_mut()) {
                links.register(tag, link);
            }
            debug!("registered {tag} {name}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_name_same_kind_is_a_no_op() {
        let mut fs = FileSystemEmulator::new();
        fs.make_directory("C:\\Dir1").unwrap();
        let before = fs.len();

        fs.make_directory("C:\\Dir1").unwrap();

        assert_eq!(fs.len(), before);
    }

    #[test]
    fn directory_blocked_by_file() {
        let mut fs = FileSystemEmulator::new();
        fs.make_file("C:\\name").unwrap();
        assert_eq!(
            fs.make_directory("C:\\name"),
            Err(FsError::AlreadyExistsConflict {
                name: "name".into(),
                requested: NodeKindTag::Directory,
                existing: NodeKindTag::File,
            })
        );
    }

    #[test]
    fn missing_parent_is_not_found() {
        let mut fs = FileSystemEmulator::new();
        assert_eq!(
            fs.make_directory("C:\\Dir1\\Dir2"),
            Err(FsError::not_found("C:\\Dir1"))
        );
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut fs = FileSystemEmulator::new();
        assert!(matches!(
            fs.make_directory("C:\\"),
            Err(FsError::NotFound { .. })
        ));
    }

    #[test]
    fn link_registers_against_target() {
        let mut fs = FileSystemEmulator::new();
        fs.make_file("C:\\file1").unwrap();
        fs.make_dynamic_link("C:\\file1", "C:").unwrap();

        let target = fs.resolve("C:\\file1").unwrap();
        let link = fs.resolve("C:\\dlink[C:\\file1]").unwrap();
        assert_eq!(fs.dynamic_links(target), &[link]);
        assert_eq!(fs.link_target(link), Some(target));
        assert!(fs.hard_links(target).is_empty());
    }

    #[test]
    fn repeated_link_registers_once() {
        let mut fs = FileSystemEmulator::new();
        fs.make_file("C:\\file1").unwrap();
        fs.make_hard_link("C:\\file1", "C:").unwrap();
        fs.make_hard_link("C:\\file1", "C:").unwrap();

        let target = fs.resolve("C:\\file1").unwrap();
        assert_eq!(fs.hard_links(target).len(), 1);
    }

    #[test]
    fn empty_source_links_the_current_directory_by_canonical_path() {
        let mut fs = FileSystemEmulator::new();
        fs.make_directory("C:\\A").unwrap();
        fs.make_directory("C:\\B").unwrap();
        fs.change_directory("C:\\A").unwrap();

        fs.make_dynamic_link("", "C:\\B").unwrap();

        let dir = fs.resolve("C:\\A").unwrap();
        let link = fs.resolve("C:\\B\\dlink[C:\\A]").unwrap();
        assert_eq!(fs.link_target(link), Some(dir));

        fs.change_directory("C:").unwrap();
        fs.make_directory("C:\\D").unwrap();
        fs.copy("C:\\B", "C:\\D").unwrap();
        assert_eq!(fs.dynamic_links(dir).len(), 2);
    }

    #[test]
    fn link_to_link_is_illegal() {
        let mut fs = FileSystemEmulator::new();
        fs.make_file("C:\\file1").unwrap();
        fs.make_dynamic_link("C:\\file1", "C:").unwrap();

        let err = fs
            .make_hard_link("C:\\dlink[C:\\file1]", "C:")
            .unwrap_err();
        assert!(matches!(
            err,
            FsError::IllegalTarget {
                reason: IllegalReason::LinkSource,
                ..
            }
        ));
    }
}
