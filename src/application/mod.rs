//! Application layer: script interpreter and name validation
//!
//! This layer drives the tree engine from line-oriented command scripts.

pub mod error;
pub mod error_ext;
pub mod script;
pub mod validation;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use script::{read_script, run_script, Command, ScriptOptions, ScriptOutcome};
pub use validation::{is_valid_name, is_valid_path_name};
