use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::node::{Node, NodeKind};

/// Arena-based storage for the emulated tree.
///
/// Uses a generational arena so that a handle to a destroyed node never
/// aliases a newer node: lookups through a stale handle simply miss.
/// The arena keeps the parent/child links consistent; the name under which
/// a child is keyed in its parent always equals the child's `name`.
#[derive(Debug)]
pub struct NodeArena {
    /// Arena storage for all tree nodes
    arena: Arena<Node>,
    /// Index of the synthetic super-root
    root: Index,
}

impl Default for NodeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeArena {
    /// Create an arena holding only the unnamed super-root directory.
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(Node {
            name: String::new(),
            parent: None,
            kind: NodeKind::directory(),
        });
        Self { arena, root }
    }

    pub fn root(&self) -> Index {
        self.root
    }

    /// Number of live nodes, super-root included.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Insert a new node and attach it under `parent`.
    ///
    /// The caller has already checked that `parent` is a directory with no
    /// child of the same name.
    #[instrument(level = "trace", skip(self, kind))]
    pub fn insert_node(&mut self, name: String, kind: NodeKind, parent: Index) -> Index {
        let node_idx = self.arena.insert(Node {
            name: name.clone(),
            parent: Some(parent),
            kind,
        });
        if let Some(children) = self.arena.get_mut(parent).and_then(Node::children_mut) {
            children.insert(name, node_idx);
        }
        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&Node> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut Node> {
        self.arena.get_mut(idx)
    }

    /// Child of directory `dir` named `name`.
    pub fn child(&self, dir: Index, name: &str) -> Option<Index> {
        self.get_node(dir)?.children()?.get(name).copied()
    }

    /// Unhook `idx` from its parent's children. The node stays alive.
    #[instrument(level = "trace", skip(self))]
    pub fn detach(&mut self, idx: Index) {
        let Some(node) = self.arena.get_mut(idx) else {
            return;
        };
        let name = node.name.clone();
        if let Some(parent_idx) = node.parent.take() {
            if let Some(children) = self.arena.get_mut(parent_idx).and_then(Node::children_mut) {
                children.remove(&name);
            }
        }
    }

    /// Hook a detached node under directory `parent`.
    #[instrument(level = "trace", skip(self))]
    pub fn attach(&mut self, idx: Index, parent: Index) {
        let Some(node) = self.arena.get_mut(idx) else {
            return;
        };
        node.parent = Some(parent);
        let name = node.name.clone();
        if let Some(children) = self.arena.get_mut(parent).and_then(Node::children_mut) {
            children.insert(name, idx);
        }
    }

    /// Change a node's name, re-keying it under its parent.
    #[instrument(level = "trace", skip(self))]
    pub fn rename(&mut self, idx: Index, new_name: String) {
        let Some(parent) = self.get_node(idx).and_then(|n| n.parent) else {
            if let Some(node) = self.arena.get_mut(idx) {
                node.name = new_name;
            }
            return;
        };
        self.detach(idx);
        if let Some(node) = self.arena.get_mut(idx) {
            node.name = new_name;
        }
        self.attach(idx, parent);
    }

    /// Detach and destroy a single node. Children of a destroyed directory
    /// are not visited; callers empty directories first.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_node(&mut self, idx: Index) -> Option<Node> {
        self.detach(idx);
        self.arena.remove(idx)
    }

    /// True if `ancestor` is `idx` itself or lies on its parent chain.
    pub fn is_ancestor_or_self(&self, ancestor: Index, idx: Index) -> bool {
        let mut current = Some(idx);
        while let Some(i) = current {
            if i == ancestor {
                return true;
            }
            current = self.get_node(i).and_then(|n| n.parent);
        }
        false
    }

    /// Pre-order traversal of the subtree rooted at `start`, children in
    /// name order.
    pub fn iter_from(&self, start: Index) -> TreeIterator<'_> {
        TreeIterator::new(self, start)
    }
}

pub struct TreeIterator<'a> {
    arena: &'a NodeArena,
    stack: Vec<(Index, usize)>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a NodeArena, start: Index) -> Self {
        Self {
            arena,
            stack: vec![(start, 0)],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    /// Node handle, node, and depth relative to the start node.
    type Item = (Index, &'a Node, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, depth)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if let Some(children) = node.children() {
                    // Push children in reverse order for name-ordered traversal
                    for &child in children.values().rev() {
                        self.stack.push((child, depth + 1));
                    }
                }
                return Some((current_idx, node, depth));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dir_with(arena: &mut NodeArena, parent: Index, name: &str) -> Index {
        arena.insert_node(name.to_string(), NodeKind::directory(), parent)
    }

    #[test]
    fn insert_keys_child_under_parent() {
        let mut arena = NodeArena::new();
        let root = arena.root();
        let drive = dir_with(&mut arena, root, "C:");

        assert_eq!(arena.child(root, "C:"), Some(drive));
        assert_eq!(arena.get_node(drive).and_then(|n| n.parent), Some(root));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn rename_rekeys_under_parent() {
        let mut arena = NodeArena::new();
        let root = arena.root();
        let a = dir_with(&mut arena, root, "a");

        arena.rename(a, "b".to_string());

        assert_eq!(arena.child(root, "a"), None);
        assert_eq!(arena.child(root, "b"), Some(a));
    }

    #[test]
    fn removed_handle_is_stale() {
        let mut arena = NodeArena::new();
        let root = arena.root();
        let a = dir_with(&mut arena, root, "a");

        assert!(arena.remove_node(a).is_some());
        assert!(arena.get_node(a).is_none());
        assert!(arena.remove_node(a).is_none());
        assert_eq!(arena.child(root, "a"), None);
    }

    #[test]
    fn iter_from_visits_in_name_order_with_depth() {
        let mut arena = NodeArena::new();
        let root = arena.root();
        let drive = dir_with(&mut arena, root, "C:");
        let b = dir_with(&mut arena, drive, "b");
        dir_with(&mut arena, drive, "a");
        dir_with(&mut arena, b, "c");

        let visited: Vec<(String, usize)> = arena
            .iter_from(drive)
            .map(|(_, node, depth)| (node.name.clone(), depth))
            .collect();

        assert_eq!(
            visited,
            vec![
                ("C:".to_string(), 0),
                ("a".to_string(), 1),
                ("b".to_string(), 1),
                ("c".to_string(), 2),
            ]
        );
    }

    #[test]
    fn ancestry_follows_parent_chain() {
        let mut arena = NodeArena::new();
        let root = arena.root();
        let a = dir_with(&mut arena, root, "a");
        let b = dir_with(&mut arena, a, "b");

        assert!(arena.is_ancestor_or_self(a, b));
        assert!(arena.is_ancestor_or_self(b, b));
        assert!(!arena.is_ancestor_or_self(b, a));
    }
}
