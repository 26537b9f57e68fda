//! Whole-directory primitives: copy a tree, move a tree, remove an entry.
//!
//! Moves try a rename first; across filesystems they copy the tree and then
//! remove the source. A partially copied target is removed when the copy fails.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::helpers::{io_error_with_help_io, is_cross_device};
use super::metadata::preserve_metadata;

/// Set to force the copy+remove path for moves (used by tests).
pub const FORCE_DIR_COPY_ENV: &str = "BATCH_MOVE_FORCE_DIR_COPY";

/// Recursively copy `src` to `dst` (which must not exist yet).
/// Symlinks inside the tree are recreated as links on Unix and followed elsewhere.
pub fn copy_tree(src: &Path, dst: &Path, preserve: bool) -> io::Result<()> {
    // Directory metadata is applied last so writing children doesn't clobber mtimes.
    let mut dirs: Vec<(PathBuf, fs::Metadata)> = Vec::new();

    for entry in WalkDir::new(src).follow_links(false) {
        let entry = entry.map_err(io::Error::from)?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let target = dst.join(rel);
        let ftype = entry.file_type();

        if ftype.is_dir() {
            fs::create_dir(&target).map_err(io_error_with_help_io("create directory", &target))?;
            if preserve {
                let meta = fs::metadata(entry.path())
                    .map_err(io_error_with_help_io("stat directory", entry.path()))?;
                dirs.push((target, meta));
            }
        } else if ftype.is_symlink() {
            copy_symlink(entry.path(), &target)?;
        } else if ftype.is_file() {
            fs::copy(entry.path(), &target).map_err(io_error_with_help_io("copy file", &target))?;
            if preserve {
                let meta = entry
                    .metadata()
                    .map_err(io::Error::from)?;
                preserve_metadata(&target, &meta);
            }
        } else {
            warn!(path = %entry.path().display(), "skipping special file");
        }
    }

    for (dir, meta) in dirs.iter().rev() {
        preserve_metadata(dir, meta);
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(link: &Path, target: &Path) -> io::Result<()> {
    let dest = fs::read_link(link).map_err(io_error_with_help_io("read symlink", link))?;
    std::os::unix::fs::symlink(&dest, target).map_err(io_error_with_help_io("create symlink", target))
}

#[cfg(not(unix))]
fn copy_symlink(link: &Path, target: &Path) -> io::Result<()> {
    if link.is_dir() {
        copy_tree(link, target, false)
    } else {
        fs::copy(link, target)
            .map(|_| ())
            .map_err(io_error_with_help_io("copy file", target))
    }
}

/// Relocate `src` to `dst` (which must not exist yet). `preserve` applies to
/// the copy fallback only; a rename keeps everything.
pub fn move_tree(src: &Path, dst: &Path, preserve: bool) -> io::Result<()> {
    if env::var_os(FORCE_DIR_COPY_ENV).is_none() {
        match fs::rename(src, dst) {
            Ok(()) => {
                debug!(src = %src.display(), dest = %dst.display(), "renamed directory");
                return Ok(());
            }
            Err(e) if is_cross_device(&e) => {
                info!(src = %src.display(), dest = %dst.display(), "cross-device move; copying then removing source");
            }
            Err(e) => return Err(io_error_with_help_io("rename directory", src)(e)),
        }
    }

    if let Err(e) = copy_tree(src, dst, preserve) {
        if let Err(cleanup) = remove_existing(dst) {
            warn!(path = %dst.display(), error = %cleanup, "failed to clean up partial copy");
        }
        return Err(e);
    }
    fs::remove_dir_all(src).map_err(io_error_with_help_io("remove source directory", src))?;
    debug!(src = %src.display(), dest = %dst.display(), "copied directory and removed source");
    Ok(())
}

/// Remove whatever is at `path`: a directory recursively, anything else as a
/// single unlink (symlinks are removed, never followed). Returns false if nothing was there.
pub fn remove_existing(path: &Path) -> io::Result<bool> {
    let meta = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(io_error_with_help_io("stat", path)(e)),
    };
    if meta.file_type().is_dir() {
        fs::remove_dir_all(path).map_err(io_error_with_help_io("remove directory", path))?;
    } else {
        fs::remove_file(path).map_err(io_error_with_help_io("remove file", path))?;
    }
    Ok(true)
}
