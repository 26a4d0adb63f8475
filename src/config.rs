//! Configuration file support for pipinfo.
//!
//! Settings are read from `config.yml` under the platform configuration
//! directory (`~/.config/pipinfo/` on Linux), or from an explicit
//! `--config <path>`. Command-line flags override everything read here.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::shared::error::PipinfoError;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "config.yml";
const APP_DIR: &str = "pipinfo";
const MAX_CONCURRENT_LOOKUPS_LIMIT: usize = 64;

/// Which service answers vulnerability lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum VulnerabilitySourceKind {
    /// The PyPI JSON API, which embeds OSV advisories per release
    #[default]
    Pypi,
    /// The OSV query API
    Osv,
}

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub check_latest: Option<bool>,
    pub check_vulnerabilities: Option<bool>,
    pub color: Option<bool>,
    pub progress: Option<bool>,
    pub cache_dir: Option<PathBuf>,
    pub cache_ttl_hours: Option<u64>,
    pub max_concurrent_lookups: Option<usize>,
    pub vulnerability_source: Option<VulnerabilitySourceKind>,
    pub interpreters: Option<Vec<String>>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

fn invalid(path: &Path, reason: impl Into<String>, hint: impl Into<String>) -> PipinfoError {
    PipinfoError::InvalidConfig {
        path: path.to_path_buf(),
        reason: reason.into(),
        hint: hint.into(),
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        invalid(
            path,
            e.to_string(),
            "Check that the file exists and is readable.",
        )
    })?;

    // An empty document deserializes to nothing at all.
    if content.trim().is_empty() {
        return Ok(ConfigFile::default());
    }

    let config: ConfigFile = serde_yaml_ng::from_str(&content).map_err(|e| {
        invalid(
            path,
            e.to_string(),
            "Ensure the file contains valid YAML syntax.",
        )
    })?;

    validate_config(path, &config)?;
    warn_unknown_fields(path, &config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// `<config dir>/pipinfo`, when the platform has a configuration directory.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR))
}

/// Resolves the cache directory: flag or `PIPINFO_CACHE_DIR` first, then the
/// config file, then `<cache dir>/pipinfo`, then the temporary directory.
pub fn resolve_cache_dir(explicit: Option<&Path>, config: &ConfigFile) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    if let Some(dir) = &config.cache_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| std::env::temp_dir().join(APP_DIR))
}

/// Validate the loaded configuration.
fn validate_config(path: &Path, config: &ConfigFile) -> Result<()> {
    if config.cache_ttl_hours == Some(0) {
        return Err(invalid(
            path,
            "cache_ttl_hours must be greater than 0",
            "Remove the key to use the default of 24 hours.",
        )
        .into());
    }

    if let Some(limit) = config.max_concurrent_lookups {
        if limit == 0 || limit > MAX_CONCURRENT_LOOKUPS_LIMIT {
            return Err(invalid(
                path,
                format!(
                    "max_concurrent_lookups must be between 1 and {} (got {})",
                    MAX_CONCURRENT_LOOKUPS_LIMIT, limit
                ),
                "Large values risk being rate limited by the package index.",
            )
            .into());
        }
    }

    if let Some(interpreters) = &config.interpreters {
        if interpreters.iter().any(|i| i.trim().is_empty()) {
            return Err(invalid(
                path,
                "interpreters must not contain empty entries",
                "List interpreter commands such as python3 or /usr/bin/python3.12.",
            )
            .into());
        }
    }

    if config.cache_dir.as_ref().is_some_and(|d| d.as_os_str().is_empty()) {
        return Err(invalid(
            path,
            "cache_dir must not be empty",
            "Remove the key to use the platform cache directory.",
        )
        .into());
    }

    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(path: &Path, config: &ConfigFile) {
    let mut keys: Vec<&String> = config.unknown_fields.keys().collect();
    keys.sort();
    for key in keys {
        tracing::warn!(
            "Unknown config field '{}' in {} will be ignored",
            key,
            path.display()
        );
    }
}
