use crate::inventory::domain::Vulnerability;
use crate::shared::error::LookupError;
use async_trait::async_trait;

/// LatestVersionSource port for asking a package index for a project's newest release
///
/// # Async Support
/// Implementations must be `Send + Sync` to support concurrent lookups.
#[async_trait]
pub trait LatestVersionSource: Send + Sync {
    /// Fetches the latest published version of a package
    ///
    /// # Arguments
    /// * `package_name` - Normalized name of the package
    ///
    /// # Errors
    /// Returns `LookupError::NotFound` if the index does not know the package, and
    /// another `LookupError` for transport, status or decoding failures
    async fn fetch_latest_version(&self, package_name: &str) -> Result<String, LookupError>;
}

/// VulnerabilitySource port for fetching advisories affecting one installed version
///
/// # Async Support
/// Implementations must be `Send + Sync` to support concurrent lookups.
#[async_trait]
pub trait VulnerabilitySource: Send + Sync {
    /// Short stable name of the advisory database, part of the cache key
    fn source_name(&self) -> &'static str;

    /// Fetches known vulnerabilities for a specific package version
    ///
    /// # Arguments
    /// * `package_name` - Normalized name of the package
    /// * `version` - Installed version
    ///
    /// # Returns
    /// Advisories affecting the version; an empty list means none are known
    ///
    /// # Errors
    /// Returns a `LookupError` if the source cannot answer
    async fn fetch_vulnerabilities(
        &self,
        package_name: &str,
        version: &str,
    ) -> Result<Vec<Vulnerability>, LookupError>;
}
