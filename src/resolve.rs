//! Mapping identifiers to folders under a source root.
//! - An identifier resolves when `source_root/<identifier>` exists and is a directory.
//! - Exact name match only: no normalization, case folding or globbing.
//!
//! Notes:
//! - Read-only; the source tree is never touched here.
//! - Both output lists keep input order, duplicates included.

use std::path::{Component, Path, PathBuf};
use tracing::{debug, trace};

use crate::errors::BatchError;

/// Outcome of resolving an identifier sequence against a source root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Identifiers with a matching directory, in input order.
    pub resolved: Vec<(String, PathBuf)>,
    /// Identifiers without one (absent, or present but not a directory).
    pub missing: Vec<String>,
}

impl Resolution {
    /// Resolved identifiers in input order.
    pub fn existing_ids(&self) -> Vec<String> {
        self.resolved.iter().map(|(id, _)| id.clone()).collect()
    }

    /// First `limit` missing identifiers, for bounded reporting.
    pub fn missing_preview(&self, limit: usize) -> &[String] {
        &self.missing[..self.missing.len().min(limit)]
    }

    /// Total identifiers classified.
    pub fn len(&self) -> usize {
        self.resolved.len() + self.missing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Classify each identifier as resolved or missing.
pub fn resolve_identifiers<S: AsRef<str>>(
    source_root: &Path,
    identifiers: &[S],
) -> Result<Resolution, BatchError> {
    if !source_root.is_dir() {
        return Err(BatchError::InvalidSourceRoot(source_root.to_path_buf()));
    }

    let mut out = Resolution::default();
    for id in identifiers {
        let id = id.as_ref();
        let candidate = source_root.join(id);
        // is_dir follows symlinks, so a link to a folder counts as a folder.
        if is_single_component(id) && candidate.is_dir() {
            trace!(identifier = id, path = %candidate.display(), "resolved");
            out.resolved.push((id.to_string(), candidate));
        } else {
            trace!(identifier = id, "missing");
            out.missing.push(id.to_string());
        }
    }

    debug!(
        root = %source_root.display(),
        resolved = out.resolved.len(),
        missing = out.missing.len(),
        "resolution finished"
    );
    Ok(out)
}

// Only immediate children qualify; "a/b", ".." and "" never resolve.
fn is_single_component(id: &str) -> bool {
    let mut comps = Path::new(id).components();
    matches!(
        (comps.next(), comps.next()),
        (Some(Component::Normal(name)), None) if name == std::ffi::OsStr::new(id)
    )
}
