//! dosfs: an in-memory emulator of a DOS-like file system
//!
//! Directories and files form a tree under the `C:` drive. Hard links pin
//! their target; dynamic links follow it when it moves and disappear when
//! it is removed.
//!
//! ```
//! use dosfs::domain::{FileSystemEmulator, FsError};
//!
//! let mut fs = FileSystemEmulator::new();
//! fs.make_directory("C:\\Dir1").unwrap();
//! fs.make_file("C:\\Dir1\\file1.txt").unwrap();
//! fs.make_hard_link("C:\\Dir1\\file1.txt", "C:\\Dir1").unwrap();
//!
//! assert!(matches!(
//!     fs.remove_file("C:\\Dir1\\file1.txt"),
//!     Err(FsError::LinkedEntity { .. })
//! ));
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use domain::{FileSystemEmulator, FsError, FsResult};
