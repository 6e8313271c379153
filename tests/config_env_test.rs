//! Environment overrides for Settings. Kept in a separate test binary so the
//! process-wide variables cannot leak into other config tests.

use std::env;
use std::fs;

use tempfile::TempDir;

use dosfs::config::{RenderStyle, Settings};

#[test]
fn given_env_vars_when_load_then_they_win_over_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dosfs.toml");
    fs::write(&path, "render_style = \"plain\"\nvalidate_names = true\n").unwrap();

    env::set_var("DOSFS_RENDER_STYLE", "tree");
    env::set_var("DOSFS_VALIDATE_NAMES", "false");
    let settings = Settings::load(Some(&path));
    env::remove_var("DOSFS_RENDER_STYLE");
    env::remove_var("DOSFS_VALIDATE_NAMES");

    let settings = settings.expect("load settings");
    assert_eq!(settings.render_style, RenderStyle::Tree);
    assert!(!settings.validate_names);
    assert!(settings.color);

    // invalid style in the environment is a config error
    env::set_var("DOSFS_RENDER_STYLE", "fancy");
    let result = Settings::load(Some(&path));
    env::remove_var("DOSFS_RENDER_STYLE");
    assert!(result.is_err());
}
