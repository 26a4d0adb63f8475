use crate::inventory::domain::{InstallRoot, MetadataLocation, MetadataShape};
use crate::inventory::services::MetadataShapeDetector;
use crate::ports::outbound::{MetadataReader, RawMetadata};
use crate::shared::error::{ParseError, ScanError};
use crate::shared::security::{resolve_symlink_once, validate_file_size, MAX_METADATA_SIZE};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const REQUIRES_TXT: &str = "requires.txt";

/// FileSystemReader adapter for reading package metadata from site-packages directories
///
/// Symbolic links are followed one level at most, both for root entries and for the
/// metadata files inside them. Files are decoded lossily so invalid UTF-8 never fails
/// a record.
pub struct FileSystemReader;

impl FileSystemReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemReader {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystemReader {
    /// Safely read a metadata file with security checks:
    /// - Follow at most one level of symbolic link
    /// - Validate file is a regular file
    /// - Check file size limits
    fn safe_read_file(&self, path: &Path, location: &Path) -> Result<String, ParseError> {
        let unreadable = |details: String| ParseError::Unreadable {
            location: location.to_path_buf(),
            details,
        };

        let resolved = resolve_symlink_once(path)
            .map_err(|e| unreadable(format!("{}: {}", path.display(), e)))?
            .ok_or_else(|| {
                unreadable(format!(
                    "Security: {} is a chain of symbolic links",
                    path.display()
                ))
            })?;

        let metadata = fs::metadata(&resolved)
            .map_err(|e| unreadable(format!("{}: {}", path.display(), e)))?;

        if !metadata.is_file() {
            return Err(unreadable(format!(
                "{} is not a regular file",
                path.display()
            )));
        }

        // Security check: File size limit (prevent DoS via huge files)
        validate_file_size(metadata.len(), path, MAX_METADATA_SIZE)
            .map_err(|e| unreadable(e.to_string()))?;

        let bytes =
            fs::read(&resolved).map_err(|e| unreadable(format!("{}: {}", path.display(), e)))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn unreadable_root(root: &Path, e: impl ToString) -> ScanError {
        ScanError::Unreadable {
            root: root.to_path_buf(),
            details: e.to_string(),
        }
    }

    /// Classifies one root entry, following a symbolic link once.
    fn entry_shape(path: &Path, file_name: &str) -> Option<MetadataShape> {
        let resolved = match resolve_symlink_once(path) {
            Ok(Some(resolved)) => resolved,
            Ok(None) => {
                tracing::debug!("skipping symbolic link chain {}", path.display());
                return None;
            }
            Err(e) => {
                tracing::debug!("skipping {}: {}", path.display(), e);
                return None;
            }
        };
        let is_dir = resolved.is_dir();
        MetadataShapeDetector::detect(file_name, is_dir)
    }
}

impl MetadataReader for FileSystemReader {
    fn scan_root(&self, root: &InstallRoot) -> Result<Option<Vec<MetadataLocation>>, ScanError> {
        let root_path = root.path();

        let resolved = match resolve_symlink_once(root_path) {
            Ok(Some(resolved)) => resolved,
            Ok(None) => {
                return Err(Self::unreadable_root(
                    root_path,
                    "Security: installation root is a chain of symbolic links",
                ))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Self::unreadable_root(root_path, e)),
        };

        if !resolved.is_dir() {
            return Err(ScanError::NotADirectory {
                root: root_path.to_path_buf(),
            });
        }

        let entries = fs::read_dir(&resolved).map_err(|e| Self::unreadable_root(root_path, e))?;

        let mut locations = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Self::unreadable_root(root_path, e))?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };

            let path: PathBuf = root_path.join(file_name);
            if let Some(shape) = Self::entry_shape(&path, file_name) {
                locations.push(MetadataLocation::new(path, shape, root));
            }
        }

        locations.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(Some(locations))
    }

    fn read_record(&self, location: &MetadataLocation) -> Result<RawMetadata, ParseError> {
        let header_path = match location.shape.header_file() {
            Some(file_name) => location.path.join(file_name),
            None => location.path.clone(),
        };

        if fs::symlink_metadata(&header_path).is_err() {
            return Err(ParseError::MissingMetadataFile {
                location: location.path.clone(),
                expected: location.shape.header_file().unwrap_or("PKG-INFO").to_string(),
            });
        }
        let header_text = self.safe_read_file(&header_path, &location.path)?;

        let requires_txt = match location.shape {
            MetadataShape::EggInfoDir => {
                let requires_path = location.path.join(REQUIRES_TXT);
                if fs::symlink_metadata(&requires_path).is_ok() {
                    Some(self.safe_read_file(&requires_path, &location.path)?)
                } else {
                    None
                }
            }
            MetadataShape::DistInfo | MetadataShape::EggInfoFile => None,
        };

        Ok(RawMetadata {
            header_text,
            requires_txt,
        })
    }
}
