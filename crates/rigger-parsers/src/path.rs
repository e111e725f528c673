//! Path prefix helpers for mount and storage paths.

use camino::Utf8Path;

/// Strip a prefix from a path, component-wise.
///
/// `remove_path_prefix("/a/b/c", "/a/")` gives `"b/c"`. A path the prefix
/// does not match is returned unchanged.
pub fn remove_path_prefix(path: &str, prefix: &str) -> String {
    Utf8Path::new(path)
        .strip_prefix(prefix)
        .map(|rest| rest.as_str().to_string())
        .unwrap_or_else(|_| path.to_string())
}

/// Prepend a prefix unless the path already carries it.
pub fn add_path_prefix(path: &str, prefix: &str) -> String {
    if path.starts_with(prefix) {
        path.to_string()
    } else {
        format!("{prefix}{path}")
    }
}
