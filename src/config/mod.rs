//! Config module.
//! Provides configuration types, default paths, XML loading and validation.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{default_config_path, path_has_symlink_ancestor};
pub use types::{Config, LogLevel};
pub use xml::{load_config, load_config_from_xml_path};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "BATCH_MOVE_CONFIG";
pub const CHUNK_PREFIX_DEFAULT: &str = "chunk_";
pub const CHUNKS_DIR_DEFAULT: &str = "chunks";
