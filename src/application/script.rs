//! Line-oriented command scripts driving the tree engine
//!
//! One command per line, tokens separated by spaces, keywords
//! case-insensitive:
//!
//! ```text
//! MD C:\Dir1
//! MF C:\Dir1\file1.txt
//! MHL C:\Dir1\file1.txt C:\Dir1
//! ```

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use itertools::Itertools;
use tracing::{debug, info, instrument, warn};

use crate::application::validation::is_valid_path_name;
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{FileSystemEmulator, FsResult, NodeKindTag};

/// A parsed script command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MakeDirectory(String),
    MakeFile(String),
    ChangeDirectory(String),
    RemoveDirectory(String),
    RemoveFile(String),
    DeleteTree(String),
    MakeHardLink { source: String, dest: String },
    MakeDynamicLink { source: String, dest: String },
    Copy { source: String, dest: String },
    Move { source: String, dest: String },
}

impl Command {
    /// Parse one script line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str, line_no: usize) -> ApplicationResult<Option<Self>> {
        let tokens = line.split_whitespace().collect_vec();
        let Some((keyword, args)) = tokens.split_first() else {
            return Ok(None);
        };
        let keyword = keyword.to_ascii_uppercase();

        let arg = |n: usize| -> ApplicationResult<String> {
            args.get(n)
                .map(|s| s.to_string())
                .ok_or_else(|| ApplicationError::MissingArgument {
                    command: keyword.clone(),
                    line: line_no,
                })
        };

        let command = match keyword.as_str() {
            "MD" => Command::MakeDirectory(arg(0)?),
            "MF" => Command::MakeFile(arg(0)?),
            "CD" => Command::ChangeDirectory(arg(0)?),
            "RD" => Command::RemoveDirectory(arg(0)?),
            "DEL" => Command::RemoveFile(arg(0)?),
            "DELTREE" => Command::DeleteTree(arg(0)?),
            "MHL" => Command::MakeHardLink {
                source: arg(0)?,
                dest: arg(1)?,
            },
            "MDL" => Command::MakeDynamicLink {
                source: arg(0)?,
                dest: arg(1)?,
            },
            "COPY" => Command::Copy {
                source: arg(0)?,
                dest: arg(1)?,
            },
            "MOVE" => Command::Move {
                source: arg(0)?,
                dest: arg(1)?,
            },
            _ => {
                return Err(ApplicationError::UnknownCommand {
                    command: keyword.clone(),
                    line: line_no,
                })
            }
        };
        Ok(Some(command))
    }

    /// Name-creating commands and the kind they create.
    fn created_name(&self) -> Option<(&str, NodeKindTag)> {
        match self {
            Command::MakeDirectory(p) => Some((p.as_str(), NodeKindTag::Directory)),
            Command::MakeFile(p) => Some((p.as_str(), NodeKindTag::File)),
            _ => None,
        }
    }

    pub fn apply(&self, fs: &mut FileSystemEmulator) -> FsResult<()> {
        match self {
            Command::MakeDirectory(p) => fs.make_directory(p),
            Command::MakeFile(p) => fs.make_file(p),
            Command::ChangeDirectory(p) => fs.change_directory(p),
            Command::RemoveDirectory(p) => fs.remove_directory(p),
            Command::RemoveFile(p) => fs.remove_file(p),
            Command::DeleteTree(p) => fs.delete_tree(p),
            Command::MakeHardLink { source, dest } => fs.make_hard_link(source, dest),
            Command::MakeDynamicLink { source, dest } => fs.make_dynamic_link(source, dest),
            Command::Copy { source, dest } => fs.copy(source, dest),
            Command::Move { source, dest } => fs.move_entity(source, dest),
        }
    }
}

/// Interpreter switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptOptions {
    /// Enforce 8.3 names on `MD` / `MF`
    pub validate_names: bool,
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self {
            validate_names: true,
        }
    }
}

/// Final state of a script run.
#[derive(Debug)]
pub struct ScriptOutcome {
    /// Tree as left by the last executed command
    pub emulator: FileSystemEmulator,
    /// Commands that completed successfully
    pub executed: usize,
    /// First failure; execution stops there
    pub error: Option<ApplicationError>,
}

impl ScriptOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Execute `script` against a fresh emulator, stopping at the first error.
#[instrument(level = "debug", skip(script))]
pub fn run_script(script: &str, options: ScriptOptions) -> ScriptOutcome {
    let mut emulator = FileSystemEmulator::new();
    let mut executed = 0;

    for (idx, raw) in script.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim_end_matches('\r');

        match execute_line(&mut emulator, line, line_no, options) {
            Ok(true) => executed += 1,
            Ok(false) => {}
            Err(e) => {
                warn!("script stopped: {}", e);
                return ScriptOutcome {
                    emulator,
                    executed,
                    error: Some(e),
                };
            }
        }
    }

    info!("script finished: {} commands", executed);
    ScriptOutcome {
        emulator,
        executed,
        error: None,
    }
}

/// Returns whether a command was executed (blank lines are not).
fn execute_line(
    emulator: &mut FileSystemEmulator,
    line: &str,
    line_no: usize,
    options: ScriptOptions,
) -> ApplicationResult<bool> {
    let Some(command) = Command::parse(line, line_no)? else {
        return Ok(false);
    };
    debug!("line {}: {:?}", line_no, command);

    if options.validate_names {
        if let Some((path, kind)) = command.created_name() {
            if !is_valid_path_name(path) {
                return Err(ApplicationError::InvalidName {
                    name: path.to_string(),
                    kind,
                    line: line_no,
                });
            }
        }
    }

    command
        .apply(emulator)
        .map_err(|source| ApplicationError::Fs {
            line: line_no,
            source,
        })?;
    Ok(true)
}

/// Read a script from a file, or from stdin when `path` is `-`.
pub fn read_script(path: &Path) -> ApplicationResult<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .with_path_context("read script", path)?;
        return Ok(buf);
    }
    fs::read_to_string(path).with_path_context("read script", path)
}
