use crate::inventory::domain::{QueryKind, Vulnerability};
use crate::shared::error::CacheError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity of a cached answer.
///
/// Latest-version answers do not depend on the installed version, so `version`
/// is only set for vulnerability queries. Those also record which advisory
/// source answered, since sources disagree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub kind: QueryKind,
    pub package: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl CacheKey {
    pub fn latest_version(normalized_name: &str) -> Self {
        Self {
            kind: QueryKind::LatestVersion,
            package: normalized_name.to_string(),
            version: None,
            source: None,
        }
    }

    pub fn vulnerabilities(source: &str, normalized_name: &str, version: &str) -> Self {
        Self {
            kind: QueryKind::Vulnerabilities,
            package: normalized_name.to_string(),
            version: Some(version.to_string()),
            source: Some(source.to_string()),
        }
    }
}

/// Cached answer body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CachePayload {
    LatestVersion { version: String },
    Vulnerabilities { items: Vec<Vulnerability> },
    /// The index answered that it has no such package.
    Failed { reason: String },
}

/// One cached remote lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: CacheKey,
    pub fetched_at: DateTime<Utc>,
    pub payload: CachePayload,
}

/// CacheStore port for persisting lookup answers between runs
///
/// Entries are stored and replaced one at a time. A store shared by concurrent
/// workers or processes must never expose a partially written entry.
pub trait CacheStore: Send + Sync {
    /// Loads the entry for a key
    ///
    /// # Returns
    /// `Ok(None)` when nothing is cached for the key
    ///
    /// # Errors
    /// Returns a `CacheError` if the entry exists but cannot be read or decoded
    fn load(&self, key: &CacheKey) -> Result<Option<CacheEntry>, CacheError>;

    /// Writes an entry, atomically replacing any previous entry for the same key
    ///
    /// # Errors
    /// Returns a `CacheError` if the entry cannot be written
    fn store(&self, entry: &CacheEntry) -> Result<(), CacheError>;
}
