use crate::ports::outbound::{CacheEntry, CacheKey, CacheStore};
use crate::shared::error::CacheError;
use crate::shared::security::sanitize_file_component;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// FileCacheStore adapter keeping one JSON file per cache entry
///
/// Layout: `<cache_dir>/<query kind>/<package>[@<version>].json`.
///
/// Writes go to a uniquely named temporary file in the same directory which is then
/// renamed over the entry, so readers (other workers, other processes) only ever see
/// a complete old entry or a complete new one.
pub struct FileCacheStore {
    cache_dir: PathBuf,
}

impl FileCacheStore {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn entry_path(&self, key: &CacheKey) -> PathBuf {
        let mut file_name = sanitize_file_component(&key.package);
        if let Some(version) = &key.version {
            file_name.push('@');
            file_name.push_str(&sanitize_file_component(version));
        }
        file_name.push_str(".json");
        let mut dir = self.cache_dir.join(key.kind.as_str());
        if let Some(source) = &key.source {
            dir.push(sanitize_file_component(source));
        }
        dir.join(file_name)
    }
}

impl CacheStore for FileCacheStore {
    fn load(&self, key: &CacheKey) -> Result<Option<CacheEntry>, CacheError> {
        let path = self.entry_path(key);

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CacheError::Read {
                    path,
                    details: e.to_string(),
                })
            }
        };

        let entry: CacheEntry =
            serde_json::from_str(&content).map_err(|e| CacheError::Corrupt {
                path: path.clone(),
                details: e.to_string(),
            })?;

        // Sanitizing can map two keys to one file name
        if &entry.key != key {
            tracing::debug!("cache entry {} belongs to another key", path.display());
            return Ok(None);
        }

        Ok(Some(entry))
    }

    fn store(&self, entry: &CacheEntry) -> Result<(), CacheError> {
        let path = self.entry_path(&entry.key);
        let write_error = |details: String| CacheError::Write {
            path: path.clone(),
            details,
        };

        let dir = path
            .parent()
            .ok_or_else(|| write_error("cache entry has no parent directory".to_string()))?;
        fs::create_dir_all(dir).map_err(|e| write_error(e.to_string()))?;

        let content = serde_json::to_vec_pretty(entry).map_err(|e| write_error(e.to_string()))?;

        let mut temp = NamedTempFile::new_in(dir).map_err(|e| write_error(e.to_string()))?;
        temp.write_all(&content)
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|e| write_error(e.to_string()))?;
        temp.persist(&path)
            .map_err(|e| write_error(e.error.to_string()))?;

        Ok(())
    }
}
