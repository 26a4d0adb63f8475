use crate::shared::Result;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Maximum metadata file size (16 MB)
/// METADATA files embed the long description, but nothing legitimate comes close.
pub const MAX_METADATA_SIZE: u64 = 16 * 1024 * 1024;

/// Maximum length of a single path component derived from untrusted input
const MAX_COMPONENT_LENGTH: usize = 200;

/// Validates file size is within acceptable limits
///
/// # Security
/// This prevents DoS attacks via excessively large files that could consume
/// system resources or cause out-of-memory errors.
///
/// # Errors
/// Returns an error if the file size exceeds the maximum
pub fn validate_file_size(file_size: u64, path: &Path, max_size: u64) -> Result<()> {
    if file_size > max_size {
        anyhow::bail!(
            "Security: {} is too large ({} bytes). Maximum allowed size is {} bytes.",
            path.display(),
            file_size,
            max_size
        );
    }
    Ok(())
}

/// Resolves a directory entry that may be a symbolic link, following at most one level.
///
/// Returns `Ok(Some(path))` with the path to use for the entry (the entry itself when it is
/// not a link, its target when it is a link to a non-link), and `Ok(None)` when the link
/// points at another link. Chains are never followed further.
///
/// # Errors
/// Returns the underlying I/O error when the entry or its target cannot be inspected.
pub fn resolve_symlink_once(path: &Path) -> io::Result<Option<PathBuf>> {
    let metadata = fs::symlink_metadata(path)?;
    if !metadata.is_symlink() {
        return Ok(Some(path.to_path_buf()));
    }

    let target = fs::read_link(path)?;
    let target = if target.is_relative() {
        match path.parent() {
            Some(parent) => parent.join(target),
            None => target,
        }
    } else {
        target
    };

    if fs::symlink_metadata(&target)?.is_symlink() {
        return Ok(None);
    }
    Ok(Some(target))
}

/// Turns untrusted text (package names, versions) into a single safe file name component.
///
/// Anything outside `[A-Za-z0-9._+!-]` becomes `_`, leading dots are replaced so the result
/// can never be `.` or `..`, and the length is capped.
pub fn sanitize_file_component(text: &str) -> String {
    let mut sanitized: String = text
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '+' | '!' | '-') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_COMPONENT_LENGTH)
        .collect();

    if sanitized.starts_with('.') {
        sanitized.replace_range(0..1, "_");
    }
    if sanitized.is_empty() {
        sanitized.push('_');
    }
    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_validate_file_size_within_limit() {
        let path = PathBuf::from("/test/METADATA");
        let result = validate_file_size(1000, &path, MAX_METADATA_SIZE);
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_file_size_exceeds_limit() {
        let path = PathBuf::from("/test/METADATA");
        let result = validate_file_size(MAX_METADATA_SIZE + 1, &path, MAX_METADATA_SIZE);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("too large"));
    }

    #[test]
    fn test_resolve_symlink_once_regular_entry() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("foo-1.0.dist-info");
        fs::create_dir(&dir).unwrap();

        let resolved = resolve_symlink_once(&dir).unwrap();
        assert_eq!(resolved, Some(dir));
    }

    #[test]
    fn test_resolve_symlink_once_missing_entry() {
        let result = resolve_symlink_once(Path::new("/nonexistent/entry"));
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_symlink_once_follows_single_link() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("real.dist-info");
        fs::create_dir(&target).unwrap();
        let link = temp_dir.path().join("link.dist-info");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let resolved = resolve_symlink_once(&link).unwrap();
        assert_eq!(resolved, Some(target));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_symlink_once_refuses_chains() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("real.dist-info");
        fs::create_dir(&target).unwrap();
        let first = temp_dir.path().join("first.dist-info");
        let second = temp_dir.path().join("second.dist-info");
        std::os::unix::fs::symlink(&target, &first).unwrap();
        std::os::unix::fs::symlink(&first, &second).unwrap();

        let resolved = resolve_symlink_once(&second).unwrap();
        assert_eq!(resolved, None);
    }

    #[test]
    fn test_sanitize_file_component() {
        assert_eq!(sanitize_file_component("requests"), "requests");
        assert_eq!(sanitize_file_component("1.0+local.1"), "1.0+local.1");
        assert_eq!(sanitize_file_component("../etc/passwd"), "_._etc_passwd");
        assert_eq!(sanitize_file_component(".."), "_.");
        assert_eq!(sanitize_file_component(""), "_");
        assert_eq!(sanitize_file_component("a b/c"), "a_b_c");
    }
}
