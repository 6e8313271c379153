//! Domain layer: the tree engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod emulator;
pub mod error;
pub mod node;
pub mod path;
pub mod render;

pub use arena::NodeArena;
pub use emulator::FileSystemEmulator;
pub use error::{FsError, FsResult, IllegalReason};
pub use node::{LinkRegistry, Node, NodeId, NodeKind, NodeKindTag};
pub use render::TreeNodeConvert;
