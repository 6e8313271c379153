//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/dosfs/dosfs.toml`
//! 3. Explicit config file (`--config <file>`)
//! 4. Environment variables: `DOSFS_*` prefix
//!
//! Command-line flags are applied on top by the CLI layer.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::ValueEnum;
use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// How the final tree is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RenderStyle {
    /// DOS listing with `|_` markers
    #[default]
    Plain,
    /// Box-drawing tree
    Tree,
}

impl fmt::Display for RenderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderStyle::Plain => write!(f, "plain"),
            RenderStyle::Tree => write!(f, "tree"),
        }
    }
}

impl FromStr for RenderStyle {
    type Err = ApplicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plain" => Ok(RenderStyle::Plain),
            "tree" => Ok(RenderStyle::Tree),
            other => Err(ApplicationError::Config {
                message: format!("unknown render style: {other}"),
            }),
        }
    }
}

/// Unified configuration for dosfs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Output format of the final tree
    pub render_style: RenderStyle,
    /// Enforce 8.3 names for MD / MF
    pub validate_names: bool,
    /// Colored error output (NO_COLOR still wins)
    pub color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            render_style: RenderStyle::Plain,
            validate_names: true,
            color: true,
        }
    }
}

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub render_style: Option<RenderStyle>,
    pub validate_names: Option<bool>,
    pub color: Option<bool>,
}

/// Get the XDG config directory for dosfs.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "dosfs").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("dosfs.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            render_style: overlay.render_style.unwrap_or(self.render_style),
            validate_names: overlay.validate_names.unwrap_or(self.validate_names),
            color: overlay.color.unwrap_or(self.color),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `explicit` - Optional config file given on the command line; it
    ///   must exist when given.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config, if present
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Explicit config file
        if let Some(path) = explicit {
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        // 4. Environment variables (explicit override)
        Self::apply_env_overrides(current)
    }

    /// Apply DOSFS_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(Environment::with_prefix("DOSFS").try_parsing(true))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("render_style") {
            settings.render_style = val.parse()?;
        }
        if let Ok(val) = config.get_bool("validate_names") {
            settings.validate_names = val;
        }
        if let Ok(val) = config.get_bool("color") {
            settings.color = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# dosfs configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/dosfs/dosfs.toml
#   Explicit: dosfs --config <file>
#   Env:      DOSFS_* environment variables (e.g. DOSFS_RENDER_STYLE=tree)

# Output format of the final tree: "plain" (DOS listing) or "tree"
# render_style = "plain"

# Enforce 8.3 names (1-8 alphanumerics, optional 1-3 character extension)
# for MD and MF
# validate_names = true

# Colored error output
# color = true
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
