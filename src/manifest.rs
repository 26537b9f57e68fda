//! Manifest files: one per chunk, or one aggregate when not chunking.
//!
//! Formats:
//! - json: a pretty-printed array of strings (non-ASCII kept verbatim).
//! - text: one identifier per line, every line newline-terminated.
//!
//! Writes create parent directories and overwrite existing files.

use anyhow::Context;
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

use crate::errors::BatchError;
use crate::fs_ops::io_error_with_help;

/// File stem of the aggregate manifest written when chunking is off.
pub const AGGREGATE_STEM: &str = "all_mapping";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ManifestFormat {
    #[default]
    Json,
    Text,
}

impl ManifestFormat {
    /// File extension used for manifests in this format.
    pub fn extension(self) -> &'static str {
        match self {
            ManifestFormat::Json => "json",
            ManifestFormat::Text => "text",
        }
    }
}

impl fmt::Display for ManifestFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ManifestFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ManifestFormat::Json),
            "text" | "txt" => Ok(ManifestFormat::Text),
            other => Err(format!("invalid manifest format: '{other}' (expected json or text)")),
        }
    }
}

/// `<chunks_dir>/<chunk_name>.<ext>`
pub fn manifest_path(chunks_dir: &Path, chunk_name: &str, format: ManifestFormat) -> PathBuf {
    chunks_dir.join(format!("{chunk_name}.{}", format.extension()))
}

/// Write one chunk's identifiers to `path`.
pub fn write_manifest<S: AsRef<str>>(
    ids: &[S],
    path: &Path,
    format: ManifestFormat,
) -> Result<(), BatchError> {
    let body = match format {
        ManifestFormat::Json => {
            let list: Vec<&str> = ids.iter().map(AsRef::as_ref).collect();
            to_json(&list, path)?
        }
        ManifestFormat::Text => lines_body(ids.iter().map(AsRef::as_ref)),
    };
    write_body(path, body.as_bytes())?;
    debug!(path = %path.display(), count = ids.len(), %format, "wrote manifest");
    Ok(())
}

/// Write the aggregate manifest for an unchunked run into `chunks_dir`.
///
/// The json form maps each identifier to its file list; the text form lists
/// identifiers only. Both keep the first occurrence of a duplicate identifier.
pub fn write_aggregate(
    entries: &[(String, Vec<PathBuf>)],
    chunks_dir: &Path,
    format: ManifestFormat,
) -> Result<PathBuf, BatchError> {
    let path = manifest_path(chunks_dir, AGGREGATE_STEM, format);
    let unique = first_occurrences(entries);
    let body = match format {
        ManifestFormat::Json => to_json(&OrderedMapping(&unique), &path)?,
        ManifestFormat::Text => lines_body(unique.iter().map(|(id, _)| id.as_str())),
    };
    write_body(&path, body.as_bytes())?;
    debug!(path = %path.display(), count = unique.len(), %format, "wrote aggregate manifest");
    Ok(path)
}

/// Read a json manifest back into identifiers.
pub fn read_json_manifest(path: &Path) -> anyhow::Result<Vec<String>> {
    let raw = fs::read_to_string(path).map_err(io_error_with_help("read manifest", path))?;
    serde_json::from_str(&raw).with_context(|| format!("parse manifest '{}'", path.display()))
}

fn first_occurrences(entries: &[(String, Vec<PathBuf>)]) -> Vec<&(String, Vec<PathBuf>)> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(entries.len());
    for entry in entries {
        if seen.insert(entry.0.as_str()) {
            unique.push(entry);
        }
    }
    unique
}

// Serializes entries as a JSON object in slice order.
struct OrderedMapping<'a>(&'a [&'a (String, Vec<PathBuf>)]);

impl Serialize for OrderedMapping<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, files) in self.0.iter().copied() {
            let files: Vec<String> = files
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect();
            map.serialize_entry(id, &files)?;
        }
        map.end()
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<String, BatchError> {
    serde_json::to_string_pretty(value)
        .map(|mut s| {
            s.push('\n');
            s
        })
        .map_err(|e| BatchError::IoWrite {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })
}

fn lines_body<'a>(ids: impl Iterator<Item = &'a str>) -> String {
    ids.fold(String::new(), |mut acc, id| {
        acc.push_str(id);
        acc.push('\n');
        acc
    })
}

fn write_body(path: &Path, body: &[u8]) -> Result<(), BatchError> {
    let io_err = |source| BatchError::IoWrite {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, body).map_err(io_err)
}
