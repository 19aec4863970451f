//! Working-copy helpers for skin directories

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// First free path among `base`, `base(1)`, `base(2)`, ...
pub fn unique_path(base: &Path) -> PathBuf {
    let mut candidate = base.to_path_buf();
    let mut i = 1;
    while candidate.exists() {
        let mut name = base.as_os_str().to_os_string();
        name.push(format!("({})", i));
        candidate = PathBuf::from(name);
        i += 1;
    }
    candidate
}

/// Sibling of `dir` named `{dir name}{suffix}`, made unique.
///
/// Returns `None` when `dir` has no final component (e.g. `/`).
pub fn copy_destination(dir: &Path, suffix: &str) -> Option<PathBuf> {
    let name = dir.file_name()?;
    let mut sibling = name.to_os_string();
    sibling.push(suffix);
    let parent = dir.parent().unwrap_or(Path::new(""));
    Some(unique_path(&parent.join(sibling)))
}

/// Recursively copy `from` into a new directory `to`, following symlinks.
pub fn copy_dir_all(from: &Path, to: &Path) -> io::Result<()> {
    for entry in WalkDir::new(from).follow_links(true) {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(from) else {
            continue;
        };
        let target = to.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
