use crate::inventory::domain::InstallRoot;
use crate::shared::error::PipinfoError;
use async_trait::async_trait;

/// SiteLocator port for resolving an interpreter's package directories
///
/// This port abstracts asking a Python interpreter where it looks for packages,
/// so the inventory itself never performs discovery.
#[async_trait]
pub trait SiteLocator: Send + Sync {
    /// Resolves the installation roots of one interpreter
    ///
    /// # Arguments
    /// * `interpreter` - Interpreter command, e.g. `python3` or `/usr/bin/python3.12`
    ///
    /// # Returns
    /// Installation roots tagged with scope and runtime bucket, in `sys.path` order
    ///
    /// # Errors
    /// Returns `PipinfoError::SiteDiscovery` if the interpreter cannot be run or its
    /// answer cannot be understood
    async fn locate(&self, interpreter: &str) -> Result<Vec<InstallRoot>, PipinfoError>;
}
