//! Applying one chunk to a destination root.
//!
//! Each `(identifier, source)` pair is copied or moved to
//! `<dest_root>/<chunk_name>/<identifier>`, strictly in the given order.
//! An existing target is removed first unless `force_overwrite` is off.
//! There is no rollback: on the first failure the chunk stops and items
//! already applied stay where they are.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::helpers::io_error_with_help_io;
use super::tree::{copy_tree, move_tree, remove_existing};
use crate::errors::BatchError;

/// What to do with each resolved folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    Copy,
    Move,
}

impl TransferMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TransferMode::Copy => "copy",
            TransferMode::Move => "move",
        }
    }
}

/// Knobs for a chunk transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOptions {
    /// Remove an existing target before copying/moving (default true).
    pub force_overwrite: bool,
    /// Carry timestamps and permissions when copying.
    pub preserve_metadata: bool,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            force_overwrite: true,
            preserve_metadata: true,
        }
    }
}

/// Copy or move every entry of one chunk into `dest_root/chunk_name/`.
/// Returns the applied targets in order.
pub fn transact_chunk(
    entries: &[(String, PathBuf)],
    dest_root: &Path,
    chunk_name: &str,
    mode: TransferMode,
    opts: TransferOptions,
) -> Result<Vec<PathBuf>, BatchError> {
    let chunk_dir = dest_root.join(chunk_name);
    let fail = |identifier: &str, source: io::Error| BatchError::Transaction {
        chunk: chunk_name.to_string(),
        identifier: identifier.to_string(),
        source,
    };

    fs::create_dir_all(&chunk_dir)
        .map_err(io_error_with_help_io("create chunk directory", &chunk_dir))
        .map_err(|e| fail(entries.first().map_or("", |(id, _)| id.as_str()), e))?;

    let mut applied = Vec::with_capacity(entries.len());
    for (id, src) in entries {
        let target = chunk_dir.join(id);
        apply_one(src, &target, &chunk_dir, mode, opts).map_err(|e| {
            warn!(chunk = chunk_name, identifier = %id, error = %e, "transfer failed; stopping chunk");
            fail(id, e)
        })?;
        info!(chunk = chunk_name, identifier = %id, mode = mode.as_str(), dest = %target.display(), "applied");
        applied.push(target);
    }
    Ok(applied)
}

fn apply_one(
    src: &Path,
    target: &Path,
    chunk_dir: &Path,
    mode: TransferMode,
    opts: TransferOptions,
) -> io::Result<()> {
    // Check the source before touching the target so a vanished source
    // (e.g. a duplicate identifier already moved) never costs us the target.
    let src_real = dunce::canonicalize(src).map_err(io_error_with_help_io("locate source", src))?;
    if let Ok(dir_real) = dunce::canonicalize(chunk_dir) {
        if dir_real.starts_with(&src_real) {
            return Err(io_error_with_help_io("place destination", chunk_dir)(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("destination is inside source '{}'", src.display()),
            )));
        }
    }

    if fs::symlink_metadata(target).is_ok() {
        // Removing a target that is (or holds) the source would destroy it.
        if let Ok(target_real) = dunce::canonicalize(target)
            && src_real.starts_with(&target_real)
        {
            return Err(io_error_with_help_io("write target", target)(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("target would overwrite source '{}'", src.display()),
            )));
        }
        if !opts.force_overwrite {
            return Err(io_error_with_help_io("write target", target)(io::Error::from(
                io::ErrorKind::AlreadyExists,
            )));
        }
        remove_existing(target)?;
        debug!(path = %target.display(), "removed existing target");
    }

    match mode {
        TransferMode::Copy => copy_tree(src, target, opts.preserve_metadata),
        TransferMode::Move => move_tree(src, target, opts.preserve_metadata),
    }
}
