//! Path helpers: file type tokens and lexical path cleaning.
//!
//! Both functions are purely syntactic. They never touch the file system, so
//! they are safe to call on paths that do not exist (yet).
//!
//! ## File Type Tokens
//!
//! A token is the lower-cased text after the last `.` of the final path
//! segment, without the dot:
//!
//! - `photos/Dawn.PNG` → `"png"`
//! - `backup/archive.tar.gz` → `"gz"` (only the last segment counts)
//! - `README` → `""`

use std::path::{Component, Path, PathBuf};

/// Parse a file's type token from its name or path.
///
/// Returns an empty string if the final path segment has no `.`.
pub fn parse_file_type(path: &str) -> String {
    let ext = path
        .char_indices()
        .rev()
        .take_while(|&(_, c)| !std::path::is_separator(c))
        .find(|&(_, c)| c == '.')
        .map(|(i, _)| &path[i..])
        .unwrap_or("");
    ext.strip_prefix('.').unwrap_or(ext).to_lowercase()
}

/// Lexically normalize a path.
///
/// Collapses repeated separators, drops `.` segments and resolves `..` against
/// the preceding segment where one exists. `..` directly under the root is
/// dropped; leading `..` on a relative path is kept. An empty result becomes
/// `"."`.
pub fn clean_path(path: impl AsRef<Path>) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.as_ref().components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}
