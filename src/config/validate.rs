//! Config validation logic.
//! Catches settings that would produce broken output paths before anything runs.

use anyhow::{Result, bail};
use std::path::Path;
use tracing::{debug, error};

use super::types::Config;

impl Config {
    /// Validate naming and output locations.
    pub fn validate(&self) -> Result<()> {
        // 1) The prefix becomes a path component: `<dest>/<prefix><n>/`.
        if self.chunk_prefix.contains(['/', '\\']) {
            error!(prefix = %self.chunk_prefix, "chunk_prefix contains a path separator");
            bail!(
                "chunk_prefix must not contain path separators: '{}'",
                self.chunk_prefix
            );
        }
        if self.chunk_prefix.starts_with("..") || self.chunk_prefix == "." {
            bail!("chunk_prefix must not start with '..' or be '.': '{}'", self.chunk_prefix);
        }

        // 2) chunks_dir may be absent (created on write) but must not be a file.
        ensure_not_file(&self.chunks_dir, "chunks_dir")?;

        // 3) log_file must not name a directory.
        if let Some(lf) = &self.log_file
            && lf.is_dir()
        {
            bail!("log_file points at a directory: {}", lf.display());
        }

        debug!(
            prefix = %self.chunk_prefix,
            chunks_dir = %self.chunks_dir.display(),
            format = %self.manifest_format,
            "config validated"
        );
        Ok(())
    }
}

fn ensure_not_file(path: &Path, name: &str) -> Result<()> {
    if path.exists() && !path.is_dir() {
        error!("{name} exists but isn't a directory: {}", path.display());
        bail!("{name} exists but isn't a directory: {}", path.display());
    }
    Ok(())
}
