//! Batch runner: resolve → list → chunk → save manifests and/or copy/move.
//!
//! Everything is driven by an explicit `BatchRequest`; there is no hidden
//! process-wide state. Preconditions are checked before anything is written.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::chunk::{chunk_name, chunk_size_from, chunkify};
use crate::errors::BatchError;
use crate::fs_ops::{TransferMode, TransferOptions, io_error_with_help_io, transact_chunk};
use crate::listing::list_files;
use crate::manifest::{ManifestFormat, manifest_path, write_aggregate, write_manifest};
use crate::resolve::{Resolution, resolve_identifiers};

/// Inputs for one run.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub source_root: PathBuf,
    pub identifiers: Vec<String>,
    /// 0 = no chunking; negative is rejected.
    pub chunk_size: i64,
    pub chunk_prefix: String,
    pub chunks_dir: PathBuf,
    pub manifest_format: ManifestFormat,
    pub save_manifests: bool,
    pub operation: Option<TransferMode>,
    pub destination_root: Option<PathBuf>,
    pub recursive: bool,
    /// Report only: skip manifests and transfers.
    pub print_only: bool,
    pub transfer: TransferOptions,
}

impl BatchRequest {
    /// Request with default naming/format and no side effects.
    pub fn new(source_root: impl Into<PathBuf>, identifiers: Vec<String>, chunk_size: i64) -> Self {
        Self {
            source_root: source_root.into(),
            identifiers,
            chunk_size,
            chunk_prefix: crate::config::CHUNK_PREFIX_DEFAULT.to_string(),
            chunks_dir: PathBuf::from(crate::config::CHUNKS_DIR_DEFAULT),
            manifest_format: ManifestFormat::Json,
            save_manifests: false,
            operation: None,
            destination_root: None,
            recursive: true,
            print_only: false,
            transfer: TransferOptions::default(),
        }
    }
}

/// One chunk as planned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSummary {
    pub name: String,
    pub ids: Vec<String>,
}

/// What a run did.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub total_ids: usize,
    pub resolution: Resolution,
    /// Sorted file list per resolved identifier, input order.
    pub files: Vec<(String, Vec<PathBuf>)>,
    /// False when chunk size was 0 (one implicit group).
    pub chunked: bool,
    pub chunks: Vec<ChunkSummary>,
    pub manifests_written: Vec<PathBuf>,
    pub manifest_failures: Vec<BatchError>,
    /// Chunk name → applied targets, for chunks that were transferred.
    pub transferred: Vec<(String, Vec<PathBuf>)>,
    /// The transfer failure that stopped the run, if any.
    pub transfer_error: Option<BatchError>,
}

/// Run a batch. Precondition failures are returned before anything is written.
/// Manifest write failures are collected in the report; a transfer failure
/// stops the run and is stored in `transfer_error` next to the partial report.
pub fn run_batch(req: &BatchRequest) -> Result<BatchReport, BatchError> {
    // 1) Preconditions, before any mutation.
    let chunk_size = chunk_size_from(req.chunk_size)?;
    let destination = match (req.operation, &req.destination_root) {
        (Some(_), None) => return Err(BatchError::MissingDestination),
        (Some(mode), Some(d)) => Some((mode, d)),
        (None, _) => None,
    };
    let resolution = resolve_identifiers(&req.source_root, &req.identifiers)?;
    info!(
        total = req.identifiers.len(),
        found = resolution.resolved.len(),
        missing = resolution.missing.len(),
        "resolved identifiers"
    );

    // 2) Listing (reporting only).
    let files: Vec<(String, Vec<PathBuf>)> = resolution
        .resolved
        .iter()
        .map(|(id, dir)| (id.clone(), list_files(dir, req.recursive)))
        .collect();

    // 3) Chunking; the unchunked case is a single implicit group.
    let groups: Vec<Vec<(String, PathBuf)>> = match chunk_size {
        Some(n) => chunkify(&resolution.resolved, n)?,
        None if resolution.resolved.is_empty() => Vec::new(),
        None => vec![resolution.resolved.clone()],
    };
    let chunks: Vec<ChunkSummary> = groups
        .iter()
        .enumerate()
        .map(|(i, g)| ChunkSummary {
            name: chunk_name(&req.chunk_prefix, i + 1),
            ids: g.iter().map(|(id, _)| id.clone()).collect(),
        })
        .collect();

    let mut report = BatchReport {
        total_ids: req.identifiers.len(),
        resolution,
        files,
        chunked: chunk_size.is_some(),
        chunks,
        ..Default::default()
    };

    if req.print_only {
        return Ok(report);
    }

    // 4) Manifests.
    if req.save_manifests {
        save_manifests(req, &mut report);
    }

    // 5) Transfers.
    if let Some((mode, dest_root)) = destination
        && let Err(e) = transfer_chunks(req, mode, dest_root, &groups, &mut report)
    {
        match &e {
            BatchError::Transaction { chunk, identifier, .. } => {
                error!(code = e.code(), kind = e.kind(), %chunk, %identifier, error = %e, "chunk processing aborted")
            }
            _ => error!(code = e.code(), kind = e.kind(), error = %e, "transfer aborted"),
        }
        report.transfer_error = Some(e);
    }

    Ok(report)
}

fn transfer_chunks(
    req: &BatchRequest,
    mode: TransferMode,
    dest_root: &Path,
    groups: &[Vec<(String, PathBuf)>],
    report: &mut BatchReport,
) -> Result<(), BatchError> {
    fs::create_dir_all(dest_root)
        .map_err(io_error_with_help_io("create destination root", dest_root))
        .map_err(|source| BatchError::Transaction {
            chunk: report.chunks.first().map(|c| c.name.clone()).unwrap_or_default(),
            identifier: report.chunks.first().and_then(|c| c.ids.first().cloned()).unwrap_or_default(),
            source,
        })?;
    for (summary, group) in report.chunks.iter().zip(groups) {
        info!(chunk = %summary.name, folders = group.len(), mode = mode.as_str(), "processing chunk");
        let applied = transact_chunk(group, dest_root, &summary.name, mode, req.transfer)?;
        report.transferred.push((summary.name.clone(), applied));
    }
    Ok(())
}

fn save_manifests(req: &BatchRequest, report: &mut BatchReport) {
    let results: Vec<Result<PathBuf, BatchError>> = if report.chunked {
        report
            .chunks
            .iter()
            .map(|chunk| {
                let path = manifest_path(&req.chunks_dir, &chunk.name, req.manifest_format);
                write_manifest(&chunk.ids, &path, req.manifest_format).map(|()| path)
            })
            .collect()
    } else {
        vec![write_aggregate(&report.files, &req.chunks_dir, req.manifest_format)]
    };

    for result in results {
        match result {
            Ok(path) => {
                info!(path = %path.display(), "saved manifest");
                report.manifests_written.push(path);
            }
            Err(e) => {
                error!(code = e.code(), kind = e.kind(), error = %e, "manifest write failed");
                report.manifest_failures.push(e);
            }
        }
    }
}
