//! Core library for `batch_move`.
//!
//! Resolves identifiers to folders under a source root, lists their files,
//! splits the matches into fixed-size chunks, and optionally saves each chunk
//! as a manifest or copies/moves its folders into `<dest>/<chunk_name>/`.
//!
//! The core is a set of functions over explicit inputs; the binary adds
//! CLI parsing, config loading, logging and console reporting around it.

pub mod batch;
pub mod chunk;
pub mod cli;
pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod ids;
pub mod listing;
pub mod manifest;
pub mod output;
pub mod platform;
pub mod resolve;

pub use batch::{BatchReport, BatchRequest, ChunkSummary, run_batch};
pub use chunk::{chunk_name, chunk_size_from, chunkify};
pub use config::{Config, LogLevel, default_config_path, load_config, load_config_from_xml_path, path_has_symlink_ancestor};
pub use errors::BatchError;
pub use fs_ops::{TransferMode, TransferOptions, transact_chunk};
pub use ids::load_ids;
pub use listing::list_files;
pub use manifest::{ManifestFormat, manifest_path, read_json_manifest, write_aggregate, write_manifest};
pub use resolve::{Resolution, resolve_identifiers};
