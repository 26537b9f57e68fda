//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - --debug is a shorthand for --log-level debug.
//! - Flags override values loaded from the XML config.

use clap::{ArgAction, Parser, ValueEnum, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel};
use crate::fs_ops::TransferMode;
use crate::manifest::ManifestFormat;

/// `--process-chunks` choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ProcessMode {
    #[default]
    None,
    Copy,
    Move,
}

impl ProcessMode {
    pub fn transfer_mode(self) -> Option<TransferMode> {
        match self {
            ProcessMode::None => None,
            ProcessMode::Copy => Some(TransferMode::Copy),
            ProcessMode::Move => Some(TransferMode::Move),
        }
    }
}

/// Map ID-named subfolders, list files, and split into chunks for saving/processing.
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Map ID-named subfolders, list files, and split into chunks for saving/processing"
)]
pub struct Args {
    /// Main folder containing ID-named subfolders.
    #[arg(long, short = 's', value_hint = ValueHint::DirPath, required_unless_present = "print_config")]
    pub source: Option<PathBuf>,

    /// IDs file (.txt or .csv).
    #[arg(long, short = 'i', value_hint = ValueHint::FilePath, required_unless_present = "print_config")]
    pub ids: Option<PathBuf>,

    /// Column name to read when the IDs file is CSV (defaults to the first column).
    #[arg(long, short = 'c')]
    pub csv_column: Option<String>,

    /// Recursively list files inside matched folders (default).
    #[arg(long, overrides_with = "no_recursive")]
    pub recursive: bool,

    /// Only list top-level files.
    #[arg(long, overrides_with = "recursive")]
    pub no_recursive: bool,

    /// If > 0, split matched IDs into chunks of this size (0 = no chunking).
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub chunk_size: i64,

    /// Save each chunk to disk (json or text).
    #[arg(long)]
    pub save_chunks: bool,

    /// Format of saved chunk files.
    #[arg(long, value_enum)]
    pub chunk_format: Option<ManifestFormat>,

    /// Prefix for chunk files/folders, e.g. chunk_1.json or chunk_1.
    #[arg(long)]
    pub chunk_prefix: Option<String>,

    /// Directory to write chunk files into.
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub chunks_dir: Option<PathBuf>,

    /// Copy or move each chunk's folders into <process-dest>/<chunk_name>.
    #[arg(long, value_enum, default_value_t = ProcessMode::None)]
    pub process_chunks: ProcessMode,

    /// Destination root for processing (required with copy/move).
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub process_dest: Option<PathBuf>,

    /// Only print mapping and chunk summary; do not save or process.
    #[arg(long)]
    pub print_only: bool,

    /// Fail instead of replacing an existing destination folder.
    #[arg(long)]
    pub no_force_overwrite: bool,

    /// Do not carry timestamps/permissions when copying.
    #[arg(long)]
    pub no_preserve_metadata: bool,

    /// Explicit XML config file.
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Print the config file location used by batch_move and exit.
    #[arg(long)]
    pub print_config: bool,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    pub debug: bool,

    /// Set log level: quiet, normal, info, debug.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Also write logs to this file.
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON.
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(prefix) = &self.chunk_prefix {
            cfg.chunk_prefix = prefix.clone();
        }
        if let Some(dir) = &self.chunks_dir {
            cfg.chunks_dir = dir.clone();
        }
        if let Some(fmt) = self.chunk_format {
            cfg.manifest_format = fmt;
        }
        if self.no_recursive {
            cfg.recursive = false;
        } else if self.recursive {
            cfg.recursive = true;
        }
        if self.no_force_overwrite {
            cfg.force_overwrite = false;
        }
        if self.no_preserve_metadata {
            cfg.preserve_metadata = false;
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(lf) = &self.log_file {
            cfg.log_file = Some(lf.clone());
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
