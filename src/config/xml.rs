//! XML configuration support.
//! - Loads settings from config.xml (quick_xml).
//! - A missing file at the default location is not an error.
//!
//! Notes:
//! - Unknown XML fields are rejected to surface misconfigurations early.
//! - Values are trimmed; empty values fall back to defaults.

use anyhow::{Context, Result, anyhow};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::paths::default_config_path;
use super::types::{Config, LogLevel};
use crate::manifest::ManifestFormat;

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    chunk_prefix: Option<String>,
    chunks_dir: Option<String>,
    manifest_format: Option<String>,
    #[serde(default, deserialize_with = "de_bool_trimmed_opt")]
    recursive: Option<bool>,
    #[serde(default, deserialize_with = "de_bool_trimmed_opt")]
    force_overwrite: Option<bool>,
    #[serde(default, deserialize_with = "de_bool_trimmed_opt")]
    preserve_metadata: Option<bool>,
    log_level: Option<String>,
    log_file: Option<String>,
}

// Custom deserializer that trims surrounding whitespace for optional bools
fn de_bool_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }))
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

// Map XmlConfig -> Config, starting from defaults.
fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(prefix) = parsed.chunk_prefix {
        // An empty prefix is legal (chunks named "1", "2", ...).
        cfg.chunk_prefix = prefix.trim().to_string();
    }
    if let Some(dir) = non_empty(parsed.chunks_dir) {
        cfg.chunks_dir = PathBuf::from(dir);
    }
    if let Some(fmt) = non_empty(parsed.manifest_format) {
        cfg.manifest_format = fmt.parse::<ManifestFormat>().map_err(|e| anyhow!(e))?;
    }
    if let Some(r) = parsed.recursive {
        cfg.recursive = r;
    }
    if let Some(f) = parsed.force_overwrite {
        cfg.force_overwrite = f;
    }
    if let Some(p) = parsed.preserve_metadata {
        cfg.preserve_metadata = p;
    }
    if let Some(lvl) = non_empty(parsed.log_level) {
        cfg.log_level = lvl.parse::<LogLevel>().map_err(|e| anyhow!(e))?;
    }
    cfg.log_file = non_empty(parsed.log_file).map(PathBuf::from);

    Ok(cfg)
}

/// Load a Config from a specific XML file path (quick_xml).
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    xml_to_config(parsed).with_context(|| format!("invalid value in '{}'", path.display()))
}

/// Load config with the usual lookup: explicit path, else `$BATCH_MOVE_CONFIG`,
/// else the OS default. Returns defaults when the default file does not exist.
/// An explicitly named file that is missing is an error.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(p) = explicit {
        return load_config_from_xml_path(p);
    }
    let explicit_env = std::env::var_os(super::CONFIG_ENV).is_some();
    match default_config_path() {
        Some(p) if p.exists() => load_config_from_xml_path(&p),
        Some(p) if explicit_env => Err(anyhow!(
            "config file named by {} does not exist: {}",
            super::CONFIG_ENV,
            p.display()
        )),
        Some(p) => {
            debug!("No config file at {}; using defaults", p.display());
            Ok(Config::default())
        }
        None => Ok(Config::default()),
    }
}
