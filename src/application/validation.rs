//! DOS 8.3 name rules for `MD` / `MF` arguments

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::path;

fn name_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9]{1,8}(\.[A-Za-z0-9]{1,3})?$").ok())
        .as_ref()
}

/// Stem of 1-8 ASCII alphanumerics, optionally followed by a dot and an
/// extension of 1-3 ASCII alphanumerics.
pub fn is_valid_name(name: &str) -> bool {
    name_pattern().is_some_and(|re| re.is_match(name))
}

/// Validate only the final segment of a path.
pub fn is_valid_path_name(path: &str) -> bool {
    is_valid_name(path::basename(path))
}
