//! Application orchestrator.
//! Loads/merges config, initializes logging, loads identifiers, runs the batch
//! and prints the console report.

use anyhow::{Result, anyhow};
use std::process::ExitCode;
use tracing::{debug, error};

use batch_move::cli::Args;
use batch_move::output as out;
use batch_move::{BatchError, BatchReport, BatchRequest, TransferOptions, default_config_path, load_config, load_ids, run_batch};

use crate::logging::init_tracing;

const MISSING_PREVIEW: usize = 50;
const SAMPLE_MAPPINGS: usize = 20;

/// Run the CLI application.
pub fn run(args: Args) -> Result<ExitCode> {
    if args.print_config {
        print_config_location(&args);
        return Ok(ExitCode::SUCCESS);
    }

    // CLI flags win over XML values, which win over defaults.
    let mut cfg = load_config(args.config.as_deref())?;
    args.apply_overrides(&mut cfg);
    cfg.validate()?;

    let _guard = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json)?;
    debug!("Starting batch_move: {:?}", args);

    let source = args.source.clone().ok_or_else(|| anyhow!("--source is required"))?;
    let ids_path = args.ids.as_deref().ok_or_else(|| anyhow!("--ids is required"))?;

    let ids = load_ids(ids_path, args.csv_column.as_deref())?;
    if ids.is_empty() {
        out::print_user("No IDs loaded from file.");
        return Ok(ExitCode::SUCCESS);
    }

    let req = BatchRequest {
        source_root: source,
        identifiers: ids,
        chunk_size: args.chunk_size,
        chunk_prefix: cfg.chunk_prefix.clone(),
        chunks_dir: cfg.chunks_dir.clone(),
        manifest_format: cfg.manifest_format,
        save_manifests: args.save_chunks,
        operation: args.process_chunks.transfer_mode(),
        destination_root: args.process_dest.clone(),
        recursive: cfg.recursive,
        print_only: args.print_only,
        transfer: TransferOptions {
            force_overwrite: cfg.force_overwrite,
            preserve_metadata: cfg.preserve_metadata,
        },
    };

    let report = run_batch(&req).inspect_err(|e| {
        error!(code = e.code(), kind = e.kind(), error = %e, "Batch run failed");
    })?;

    print_report(&req, &report);

    if let Some(e) = &report.transfer_error {
        out::print_error(&format!("Processing stopped: {e}"));
        out::print_error(&format!(
            "{} chunk(s) fully applied before the failure; nothing was rolled back.",
            report.transferred.len()
        ));
        return Ok(exit_code_for(e));
    }
    if let Some(first) = report.manifest_failures.first() {
        out::print_error(&format!(
            "{} manifest file(s) could not be written",
            report.manifest_failures.len()
        ));
        for e in &report.manifest_failures {
            out::print_error(&e.to_string());
        }
        return Ok(exit_code_for(first));
    }
    Ok(ExitCode::SUCCESS)
}

/// Exit code for a core failure.
pub fn exit_code_for(e: &BatchError) -> ExitCode {
    ExitCode::from(u8::try_from(e.code()).unwrap_or(1))
}

fn print_config_location(args: &Args) {
    if let Some(p) = &args.config {
        out::print_info(&format!("Using config from --config:\n  {}", p.display()));
        return;
    }
    if let Some(p) = std::env::var_os(batch_move::config::CONFIG_ENV) {
        out::print_info(&format!(
            "Using {} (explicit):\n  {}",
            batch_move::config::CONFIG_ENV,
            std::path::Path::new(&p).display()
        ));
        return;
    }
    match default_config_path() {
        Some(p) => {
            out::print_info(&format!("Default batch_move config path:\n  {}", p.display()));
            if p.exists() {
                out::print_info("A config file exists at that location.");
            } else {
                out::print_info("No config file exists there; built-in defaults are used.");
            }
        }
        None => out::print_warn("Could not determine a default config path."),
    }
}

fn print_report(req: &BatchRequest, report: &BatchReport) {
    let res = &report.resolution;
    out::print_user(&format!("Total IDs provided: {}", report.total_ids));
    out::print_user(&format!("Found folders: {}", res.resolved.len()));
    out::print_user(&format!("Missing/non-existent folders: {}", res.missing.len()));
    if !res.missing.is_empty() {
        out::print_user(&format!("Missing IDs (first {MISSING_PREVIEW} shown):"));
        for m in res.missing_preview(MISSING_PREVIEW) {
            out::print_user(&format!("  - {m}"));
        }
    }

    out::print_heading(&format!("Sample mapping + file counts (first {SAMPLE_MAPPINGS}):"));
    for ((id, dir), (_, files)) in res.resolved.iter().zip(&report.files).take(SAMPLE_MAPPINGS) {
        out::print_user(&format!("  {id} -> {} (files: {})", dir.display(), files.len()));
    }

    if report.chunked {
        out::print_heading(&format!(
            "Total chunks: {} (chunk size: {})",
            report.chunks.len(),
            req.chunk_size
        ));
        for (idx, ch) in report.chunks.iter().enumerate() {
            if let (Some(first), Some(last)) = (ch.ids.first(), ch.ids.last()) {
                out::print_user(&format!(
                    "  Chunk {}: {} items (IDs: {first} ... {last})",
                    idx + 1,
                    ch.ids.len()
                ));
            }
        }
    } else {
        out::print_heading("Chunking not requested (chunk-size 0).");
    }

    if req.print_only {
        return;
    }
    for p in &report.manifests_written {
        out::print_success(&format!("Saved chunk file: {}", p.display()));
    }
    if let Some(dest) = &req.destination_root {
        for (name, applied) in &report.transferred {
            out::print_success(&format!(
                "Processed {name}: {} folders into {}",
                applied.len(),
                dest.join(name).display()
            ));
        }
    }
}
