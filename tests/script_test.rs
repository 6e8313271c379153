//! Integration tests for the command-script interpreter

use std::fs;

use dosfs::application::{read_script, run_script, ApplicationError, ScriptOptions};
use dosfs::cli::commands::render_tree;
use dosfs::config::RenderStyle;
use dosfs::domain::FsError;
use rstest::rstest;
use tempfile::TempDir;

// ============================================================
// Full scripts
// ============================================================

#[rstest]
fn given_link_script_when_run_then_listing_matches() {
    let script = "\
MD C:\\Dir1
MF C:\\Dir1\\file1.txt
MHL C:\\Dir1\\file1.txt C:\\Dir1
";
    let outcome = run_script(script, ScriptOptions::default());

    assert!(outcome.is_success(), "{:?}", outcome.error);
    assert_eq!(outcome.executed, 3);
    assert_eq!(
        outcome.emulator.render(),
        "C:\n|_Dir1\n| |_file1.txt\n| |_hlink[C:\\Dir1\\file1.txt]\n"
    );
}

#[rstest]
fn given_move_script_with_relative_paths_when_run_then_dynamic_links_follow() {
    let script = "\
md C:\\Dir1
md C:\\Dir1\\Dir2
mf C:\\Dir1\\Dir2\\file1.txt
mdl C:\\Dir1\\Dir2\\file1.txt C:\\Dir1
md C:\\BDir1
cd C:\\Dir1
move Dir2 C:\\BDir1
";
    let outcome = run_script(script, ScriptOptions::default());

    assert!(outcome.is_success(), "{:?}", outcome.error);
    assert_eq!(
        outcome.emulator.render(),
        "C:\n\
         |_BDir1\n\
         | |_Dir2\n\
         | | |_file1.txt\n\
         |_Dir1\n\
         | |_dlink[C:\\BDir1\\Dir2\\file1.txt]\n"
    );
}

#[rstest]
fn given_copy_and_deltree_script_when_run_then_only_copy_survives() {
    let script = "\
MD C:\\Dir1
MF C:\\Dir1\\a.txt
MD C:\\Dir2
COPY C:\\Dir1 C:\\Dir2
DELTREE C:\\Dir1
";
    let outcome = run_script(script, ScriptOptions::default());

    assert!(outcome.is_success(), "{:?}", outcome.error);
    assert_eq!(
        outcome.emulator.render(),
        "C:\n|_Dir2\n| |_Dir1\n| | |_a.txt\n"
    );
}

#[rstest]
fn given_blank_lines_when_run_then_they_are_not_counted() {
    let outcome = run_script("\nMD C:\\Dir1\n\n   \nRD C:\\Dir1\n", ScriptOptions::default());

    assert!(outcome.is_success());
    assert_eq!(outcome.executed, 2);
    assert_eq!(outcome.emulator.render(), "C:\n");
}

// ============================================================
// Failures
// ============================================================

#[rstest]
fn given_engine_failure_when_run_then_partial_tree_and_line_are_reported() {
    let script = "\
MD C:\\Dir1
MF C:\\Dir1\\file1.txt
MHL C:\\Dir1\\file1.txt C:
DEL C:\\Dir1\\file1.txt
MD C:\\Dir2
";
    let outcome = run_script(script, ScriptOptions::default());

    assert_eq!(outcome.executed, 3);
    let err = outcome.error.expect("script should fail");
    assert_eq!(err.line(), Some(4));
    assert_eq!(err.fs_error(), Some(&FsError::linked("C:\\Dir1\\file1.txt")));
    assert!(outcome.emulator.resolve("C:\\Dir2").is_none());
}

#[rstest]
#[case::unknown("FORMAT C:", 1)]
#[case::missing_dest("MD C:\\Dir1\nCOPY C:\\Dir1", 2)]
fn given_malformed_line_when_run_then_reported_with_line(
    #[case] script: &str,
    #[case] line: usize,
) {
    let outcome = run_script(script, ScriptOptions::default());

    let err = outcome.error.expect("script should fail");
    assert_eq!(err.line(), Some(line));
    assert!(matches!(
        err,
        ApplicationError::UnknownCommand { .. } | ApplicationError::MissingArgument { .. }
    ));
}

#[rstest]
fn given_link_name_argument_when_validating_then_only_created_names_are_checked() {
    let script = "\
MD C:\\Dir1
MF C:\\Dir1\\file1.txt
MDL C:\\Dir1\\file1.txt C:
DEL C:\\dlink[C:\\Dir1\\file1.txt]
";
    let outcome = run_script(script, ScriptOptions::default());
    assert!(outcome.is_success(), "{:?}", outcome.error);
}

// ============================================================
// Script sources and rendering
// ============================================================

#[rstest]
fn given_script_file_when_read_then_content_is_returned() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("setup.bat");
    fs::write(&path, "MD C:\\Dir1\r\nMF C:\\Dir1\\a.txt\r\n").unwrap();

    let text = read_script(&path).unwrap();
    let outcome = run_script(&text, ScriptOptions::default());

    assert!(outcome.is_success(), "{:?}", outcome.error);
    assert!(outcome.emulator.resolve("C:\\Dir1\\a.txt").is_some());
}

#[rstest]
fn given_missing_script_file_when_read_then_operation_failed() {
    let dir = TempDir::new().unwrap();
    let err = read_script(&dir.path().join("missing.bat")).unwrap_err();
    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
    assert!(err.to_string().contains("missing.bat"));
}

#[rstest]
fn given_finished_script_when_rendered_in_tree_style_then_names_appear() {
    let outcome = run_script("MD C:\\Dir1\nMF C:\\Dir1\\a.txt\n", ScriptOptions::default());

    let rendered = render_tree(&outcome.emulator, RenderStyle::Tree);

    assert!(rendered.starts_with("C:\n"));
    assert!(rendered.contains("a.txt"));
    assert_ne!(rendered, outcome.emulator.render());
}
