//! Command dispatch: wires parsed arguments to the application layer

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::{read_script, run_script, ScriptOptions};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, RenderStyle, Settings};
use crate::domain::{FileSystemEmulator, TreeNodeConvert};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    if !settings.color {
        output::disable_colors();
    }
    debug!("settings: {:?}", settings);

    match &cli.command {
        Some(Commands::Run {
            script,
            style,
            no_validate,
        }) => _run(script, *style, *no_validate, &settings),
        Some(Commands::Config { command }) => _config(command, &settings),
        Some(Commands::Completion { shell }) => _completion(*shell),
        None => Err(CliError::Usage(
            "no command given, try 'dosfs --help'".to_string(),
        )),
    }
}

/// Render the tree in the requested style.
pub fn render_tree(emulator: &FileSystemEmulator, style: RenderStyle) -> String {
    match style {
        RenderStyle::Plain => emulator.render(),
        RenderStyle::Tree => emulator.to_tree_string().to_string(),
    }
}

#[instrument(skip(settings))]
fn _run(
    script: &Path,
    style: Option<RenderStyle>,
    no_validate: bool,
    settings: &Settings,
) -> CliResult<()> {
    let text = read_script(script)?;
    let options = ScriptOptions {
        validate_names: settings.validate_names && !no_validate,
    };

    let outcome = run_script(&text, options);
    let style = style.unwrap_or(settings.render_style);
    output::tree(&render_tree(&outcome.emulator, style));

    match outcome.error {
        Some(e) => Err(e.into()),
        None => {
            debug!("{} commands executed", outcome.executed);
            Ok(())
        }
    }
}

#[instrument(skip(settings))]
fn _config(command: &ConfigCommands, settings: &Settings) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::header("# effective configuration");
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::warning("no config directory available on this platform"),
        },
    }
    Ok(())
}

fn _completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
