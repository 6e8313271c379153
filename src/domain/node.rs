//! Entity model: node variants and alias registries

use std::collections::BTreeMap;
use std::fmt;

use generational_arena::Index;

/// Stable handle of a node inside the engine's arena.
pub type NodeId = Index;

/// Payload-free discriminant of [`NodeKind`], used in errors and checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKindTag {
    Directory,
    File,
    HardLink,
    DynamicLink,
}

impl NodeKindTag {
    pub fn is_link(self) -> bool {
        matches!(self, NodeKindTag::HardLink | NodeKindTag::DynamicLink)
    }
}

impl fmt::Display for NodeKindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeKindTag::Directory => "directory",
            NodeKindTag::File => "file",
            NodeKindTag::HardLink => "hard link",
            NodeKindTag::DynamicLink => "dynamic link",
        };
        f.write_str(s)
    }
}

/// Non-owning back-references from a linkable entity to the link nodes
/// that point at it. The link nodes themselves are owned by whichever
/// directory contains them.
#[derive(Debug, Default, Clone)]
pub struct LinkRegistry {
    pub hard: Vec<NodeId>,
    pub dynamic: Vec<NodeId>,
}

impl LinkRegistry {
    pub fn register(&mut self, kind: NodeKindTag, link: NodeId) {
        match kind {
            NodeKindTag::HardLink => self.hard.push(link),
            NodeKindTag::DynamicLink => self.dynamic.push(link),
            _ => {}
        }
    }

    pub fn unregister(&mut self, link: NodeId) {
        self.hard.retain(|&l| l != link);
        self.dynamic.retain(|&l| l != link);
    }

    pub fn is_pinned(&self) -> bool {
        !self.hard.is_empty()
    }
}

/// Variant payload of a node.
#[derive(Debug)]
pub enum NodeKind {
    /// Owns its children, keyed (and therefore ordered) by name.
    Directory {
        children: BTreeMap<String, NodeId>,
        links: LinkRegistry,
    },
    File {
        links: LinkRegistry,
    },
    /// Pins `target`: the target can be neither removed nor moved.
    HardLink { target: NodeId },
    /// Tracks `target` by absolute path; severed when the target goes away.
    DynamicLink { target: NodeId },
}

impl NodeKind {
    pub fn directory() -> Self {
        NodeKind::Directory {
            children: BTreeMap::new(),
            links: LinkRegistry::default(),
        }
    }

    pub fn file() -> Self {
        NodeKind::File {
            links: LinkRegistry::default(),
        }
    }

    pub fn link(tag: NodeKindTag, target: NodeId) -> Option<Self> {
        match tag {
            NodeKindTag::HardLink => Some(NodeKind::HardLink { target }),
            NodeKindTag::DynamicLink => Some(NodeKind::DynamicLink { target }),
            _ => None,
        }
    }

    pub fn tag(&self) -> NodeKindTag {
        match self {
            NodeKind::Directory { .. } => NodeKindTag::Directory,
            NodeKind::File { .. } => NodeKindTag::File,
            NodeKind::HardLink { .. } => NodeKindTag::HardLink,
            NodeKind::DynamicLink { .. } => NodeKindTag::DynamicLink,
        }
    }
}

/// Tree node: shared fields plus the kind-specific payload.
#[derive(Debug)]
pub struct Node {
    pub name: String,
    /// Owning directory; `None` only for the synthetic super-root.
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
}

impl Node {
    pub fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    pub fn children(&self) -> Option<&BTreeMap<String, NodeId>> {
        match &self.kind {
            NodeKind::Directory { children, .. } => Some(children),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut BTreeMap<String, NodeId>> {
        match &mut self.kind {
            NodeKind::Directory { children, .. } => Some(children),
            _ => None,
        }
    }

    /// Alias registry of a linkable entity (directory or file).
    pub fn links(&self) -> Option<&LinkRegistry> {
        match &self.kind {
            NodeKind::Directory { links, .. } | NodeKind::File { links } => Some(links),
            _ => None,
        }
    }

    pub fn links_mut(&mut self) -> Option<&mut LinkRegistry> {
        match &mut self.kind {
            NodeKind::Directory { links, .. } | NodeKind::File { links } => Some(links),
            _ => None,
        }
    }

    /// Target of a link node.
    pub fn link_target(&self) -> Option<NodeId> {
        match self.kind {
            NodeKind::HardLink { target } | NodeKind::DynamicLink { target } => Some(target),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use generational_arena::Arena;

    #[test]
    fn registry_tracks_hard_and_dynamic_separately() {
        let mut ids: Arena<()> = Arena::new();
        let hard = ids.insert(());
        let dynamic = ids.insert(());

        let mut registry = LinkRegistry::default();
        registry.register(NodeKindTag::HardLink, hard);
        registry.register(NodeKindTag::DynamicLink, dynamic);
        assert!(registry.is_pinned());

        registry.unregister(hard);
        assert!(!registry.is_pinned());
        assert_eq!(registry.dynamic, vec![dynamic]);
    }

    #[test]
    fn only_link_tags_build_link_payloads() {
        let mut ids: Arena<()> = Arena::new();
        let target = ids.insert(());
        assert!(NodeKind::link(NodeKindTag::File, target).is_none());
        assert_eq!(
            NodeKind::link(NodeKindTag::HardLink, target).map(|k| k.tag()),
            Some(NodeKindTag::HardLink)
        );
    }
}
