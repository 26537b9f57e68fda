//! File listing for resolved folders (reporting only).
//! Returns absolute, symlink-resolved file paths sorted lexicographically.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// List files under `folder`. Non-recursive mode looks at immediate children only.
/// Directories are never included; an entry counts as a file after following links.
pub fn list_files(folder: &Path, recursive: bool) -> Vec<PathBuf> {
    let mut walker = WalkDir::new(folder).min_depth(1);
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files: Vec<PathBuf> = walker
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                debug!(folder = %folder.display(), error = %err, "skipping unreadable entry");
                None
            }
        })
        .filter(|e| fs::metadata(e.path()).is_ok_and(|m| m.is_file()))
        .map(|e| dunce::canonicalize(e.path()).unwrap_or_else(|_| e.into_path()))
        .collect();

    files.sort();
    files
}
