use crate::inventory::domain::{InstallRoot, MetadataLocation};
use crate::shared::error::{ParseError, ScanError};

/// Text of one metadata record, decoded but not yet parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMetadata {
    /// Content of `METADATA` / `PKG-INFO`
    pub header_text: String,
    /// Content of an egg-info `requires.txt`, when the record has one
    pub requires_txt: Option<String>,
}

/// MetadataReader port for enumerating and reading installed package metadata
///
/// This port abstracts the file system operations needed to find metadata records
/// inside an installation root and to load their content.
///
/// Implementations must be `Send + Sync`: records are read from a worker pool.
pub trait MetadataReader: Send + Sync {
    /// Lists the metadata records directly inside an installation root
    ///
    /// # Arguments
    /// * `root` - The installation root to enumerate
    ///
    /// # Returns
    /// `Ok(None)` when the root does not exist, otherwise the records found,
    /// ordered by file name
    ///
    /// # Errors
    /// Returns a `ScanError` if the root exists but cannot be enumerated
    fn scan_root(&self, root: &InstallRoot) -> Result<Option<Vec<MetadataLocation>>, ScanError>;

    /// Reads the files making up one metadata record
    ///
    /// # Arguments
    /// * `location` - A record previously returned by [`MetadataReader::scan_root`]
    ///
    /// # Errors
    /// Returns a `ParseError` if:
    /// - The expected metadata file is missing
    /// - A file cannot be read or exceeds the size limit
    fn read_record(&self, location: &MetadataLocation) -> Result<RawMetadata, ParseError>;
}
