//! File helpers shared by the commands.

use std::path::Path;

/// Creates the parent directory of `path` when it does not exist yet.
///
/// # Example
///
/// ```rust
/// # use rentpoker_cli::io_utils::ensure_parent_dir;
/// let dir = tempfile::tempdir().unwrap();
/// let file = dir.path().join("policies").join("run1.json");
/// ensure_parent_dir(&file).unwrap();
/// assert!(file.parent().unwrap().is_dir());
/// ```
pub fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir),
        _ => Ok(()),
    }
}
