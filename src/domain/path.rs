//! Path codec: drive-prefixed, backslash-separated paths and encoded link names
//!
//! Everything here is pure string handling; resolution against the tree
//! lives in the engine.

use crate::domain::node::NodeKindTag;

/// Absolute paths start with this token.
pub const DRIVE: &str = "C:";

/// Segment separator.
pub const SEPARATOR: char = '\\';

/// Opens the bracketed target path inside an encoded link name. Once seen,
/// the rest of a path is one atomic segment.
pub const LINK_OPEN: char = '[';

pub const LINK_CLOSE: char = ']';

const HARD_LINK_PREFIX: &str = "hlink";
const DYNAMIC_LINK_PREFIX: &str = "dlink";

pub fn is_absolute(path: &str) -> bool {
    path.starts_with(DRIVE)
}

/// Position of the separator that ends the parent portion of `path`, looking
/// only before the first `[`.
fn last_separator(path: &str) -> Option<usize> {
    let head = match path.find(LINK_OPEN) {
        Some(open) => &path[..open],
        None => path,
    };
    head.rfind(SEPARATOR)
}

/// Split a path into ordered segments.
///
/// Splitting stops at the first `[`: the remainder, separators included, is
/// one final segment so that link names can be addressed as a component.
pub fn split_path(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut left = 0;
    for (pos, c) in path.char_indices() {
        if c == SEPARATOR {
            segments.push(&path[left..pos]);
            left = pos + c.len_utf8();
        } else if c == LINK_OPEN {
            break;
        }
    }
    segments.push(&path[left..]);
    segments
}

/// Parent portion of a path; empty when there is no separator.
pub fn parent_path(path: &str) -> &str {
    match last_separator(path) {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Final segment of a path.
pub fn basename(path: &str) -> &str {
    match last_separator(path) {
        Some(idx) => &path[idx + SEPARATOR.len_utf8()..],
        None => path,
    }
}

/// Join a directory path and a child name.
pub fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}{SEPARATOR}{name}")
    }
}

/// Build the encoded name of a link pointing at `absolute_target`.
///
/// Returns `None` for non-link kinds.
pub fn encode_link_name(kind: NodeKindTag, absolute_target: &str) -> Option<String> {
    let prefix = match kind {
        NodeKindTag::HardLink => HARD_LINK_PREFIX,
        NodeKindTag::DynamicLink => DYNAMIC_LINK_PREFIX,
        _ => return None,
    };
    Some(format!("{prefix}{LINK_OPEN}{absolute_target}{LINK_CLOSE}"))
}

/// Extract the target path embedded in an encoded link name.
pub fn link_target_path(name: &str) -> Option<&str> {
    let open = name.find(LINK_OPEN)?;
    let close = name.rfind(LINK_CLOSE)?;
    (close > open).then(|| &name[open + LINK_OPEN.len_utf8()..close])
}
