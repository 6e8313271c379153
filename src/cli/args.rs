//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::config::RenderStyle;

/// In-memory DOS-style file system emulator with hard and dynamic links
#[derive(Parser, Debug)]
#[command(name = "dosfs")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(long, global = true, value_hint = ValueHint::FilePath, env = "DOSFS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a command script and print the resulting tree
    Run {
        /// Script file, or '-' for stdin
        #[arg(value_hint = ValueHint::FilePath)]
        script: PathBuf,
        /// Output format of the tree
        #[arg(short, long, value_enum)]
        style: Option<RenderStyle>,
        /// Accept names that break the 8.3 rule
        #[arg(long)]
        no_validate: bool,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a commented config template
    Template,
    /// Print the global config file location
    Path,
}
