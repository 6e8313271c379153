//! Read-only projections of the tree: the DOS listing and a `termtree` view

use generational_arena::Index;
use itertools::Itertools;
use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::NodeArena;
use crate::domain::emulator::FileSystemEmulator;

impl FileSystemEmulator {
    /// Sorted depth-first listing starting at the drive:
    ///
    /// ```text
    /// C:
    /// |_Dir1
    /// | |_file1.txt
    /// ```
    #[instrument(level = "debug", skip(self))]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (_, node, depth) in self.arena().iter_from(self.drive()) {
            if depth > 0 {
                out.push_str(&itertools::repeat_n("| ", depth - 1).join(""));
                out.push_str("|_");
            }
            out.push_str(&node.name);
            out.push('\n');
        }
        out
    }
}

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for FileSystemEmulator {
    fn to_tree_string(&self) -> Tree<String> {
        fn build_tree(arena: &NodeArena, node_idx: Index) -> Tree<String> {
            let Some(node) = arena.get_node(node_idx) else {
                return Tree::new(String::new());
            };
            let leaves = node
                .children()
                .into_iter()
                .flat_map(|children| children.values())
                .map(|&child| build_tree(arena, child));
            Tree::new(node.name.clone()).with_leaves(leaves)
        }

        build_tree(self.arena(), self.drive())
    }
}
