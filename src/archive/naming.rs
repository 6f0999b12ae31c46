//! Entry naming: how filesystem paths map to archive entry names.

use std::path::{Component, Path};

/// Suffix that marks a symlink entry apart from a content entry of the same path
pub const SYMLINK_SUFFIX: &str = ".symlink";

/// Derive the archive entry name for a path.
///
/// Root and prefix components are dropped and the remaining components are
/// joined with `/`, so `/home/me/a.txt` becomes `home/me/a.txt` on every
/// platform. `.` and `..` are resolved lexically; `..` never climbs above
/// the root.
pub fn entry_name(path: &Path) -> String {
    let mut parts: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::ParentDir => {
                parts.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    parts.join("/")
}

/// Entry name of the marker recorded for a symlink at `path`
pub fn symlink_entry_name(path: &Path) -> String {
    format!("{}{}", entry_name(path), SYMLINK_SUFFIX)
}
