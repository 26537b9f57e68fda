//! Configuration types for batch runs.
//! - Config: chunk naming, manifest format, transfer options and logging.
//! - LogLevel: console verbosity, parsed from config or flags.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::{CHUNKS_DIR_DEFAULT, CHUNK_PREFIX_DEFAULT};
use crate::manifest::ManifestFormat;

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// More info (like verbose)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Runtime settings shared by every run; per-run inputs (source, ids, chunk size)
/// come from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Prepended to the 1-based chunk index (`chunk_1`, `chunk_2`, ...)
    pub chunk_prefix: String,
    /// Where manifest files are written
    pub chunks_dir: PathBuf,
    /// Manifest serialization
    pub manifest_format: ManifestFormat,
    /// List files recursively inside matched folders
    pub recursive: bool,
    /// Remove an existing destination entry before copy/move
    pub force_overwrite: bool,
    /// Carry timestamps and permission bits when copying trees
    pub preserve_metadata: bool,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chunk_prefix: CHUNK_PREFIX_DEFAULT.to_string(),
            chunks_dir: PathBuf::from(CHUNKS_DIR_DEFAULT),
            manifest_format: ManifestFormat::Json,
            recursive: true,
            force_overwrite: true,
            preserve_metadata: true,
            log_level: LogLevel::Normal,
            log_file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_parse_aliases() {
        assert_eq!(LogLevel::parse("ERROR"), Some(LogLevel::Quiet));
        assert_eq!(LogLevel::parse("verbose"), Some(LogLevel::Info));
        assert_eq!(LogLevel::parse("trace"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("loud"), None);
        assert!("nope".parse::<LogLevel>().is_err());
    }

    #[test]
    fn defaults_match_reference_behavior() {
        let cfg = Config::default();
        assert_eq!(cfg.chunk_prefix, "chunk_");
        assert_eq!(cfg.chunks_dir, PathBuf::from("chunks"));
        assert_eq!(cfg.manifest_format, ManifestFormat::Json);
        assert!(cfg.recursive);
        assert!(cfg.force_overwrite);
    }
}
