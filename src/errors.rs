//! Typed error definitions for batch_move.
//! Provides a small set of well-known failure modes for better logs, tests and exit codes.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Source folder does not exist or is not a directory: {0}")]
    InvalidSourceRoot(PathBuf),

    #[error("chunk_size must be > 0 (got {0})")]
    InvalidChunkSize(i64),

    #[error("When processing chunks with copy or move you must provide a destination root")]
    MissingDestination,

    #[error("IDs file not found: {0}")]
    IdsFileNotFound(PathBuf),

    #[error("Failed to write manifest {path}: {source}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Chunk {chunk} failed at identifier '{identifier}': {source}")]
    Transaction {
        chunk: String,
        identifier: String,
        #[source]
        source: io::Error,
    },
}

impl BatchError {
    /// Stable numeric code, used as the process exit code and as a log field.
    pub fn code(&self) -> i32 {
        match self {
            BatchError::InvalidSourceRoot(_) => 2,
            BatchError::InvalidChunkSize(_) => 3,
            BatchError::MissingDestination => 4,
            BatchError::IdsFileNotFound(_) => 5,
            BatchError::IoWrite { .. } => 6,
            BatchError::Transaction { .. } => 7,
        }
    }

    /// Short machine-friendly name for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            BatchError::InvalidSourceRoot(_) => "invalid_source_root",
            BatchError::InvalidChunkSize(_) => "invalid_chunk_size",
            BatchError::MissingDestination => "missing_destination",
            BatchError::IdsFileNotFound(_) => "ids_file_not_found",
            BatchError::IoWrite { .. } => "io_write",
            BatchError::Transaction { .. } => "transaction",
        }
    }
}
