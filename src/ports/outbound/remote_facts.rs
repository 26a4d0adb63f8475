use crate::inventory::domain::{Diagnostic, PackageName, Version, Vulnerability};
use crate::shared::error::LookupError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Where an answer came from.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOrigin {
    /// A fresh cache entry; no remote call was made.
    Cache,
    /// A successful remote fetch.
    Remote,
    /// The refetch failed and the stale entry was reused.
    StaleFallback {
        fetched_at: DateTime<Utc>,
        error: LookupError,
    },
}

/// An answer and its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup<T> {
    pub value: T,
    pub origin: LookupOrigin,
}

impl<T> Lookup<T> {
    pub fn is_degraded(&self) -> bool {
        matches!(self.origin, LookupOrigin::StaleFallback { .. })
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        Lookup {
            value: f(self.value),
            origin: self.origin,
        }
    }
}

/// RemoteFacts port: cached answers to the two remote questions
///
/// This is what the inventory use case talks to. Whether an answer comes from the
/// cache, the network, or a stale fallback is reported through [`LookupOrigin`].
#[async_trait]
pub trait RemoteFacts: Send + Sync {
    /// Latest published version of a package
    ///
    /// # Errors
    /// Returns a `LookupError` when neither the cache nor the index can answer
    async fn latest_version(&self, name: &PackageName) -> Result<Lookup<Version>, LookupError>;

    /// Known vulnerabilities of an installed version
    ///
    /// # Errors
    /// Returns a `LookupError` when neither the cache nor the source can answer
    async fn vulnerabilities(
        &self,
        name: &PackageName,
        version: &Version,
    ) -> Result<Lookup<Vec<Vulnerability>>, LookupError>;

    /// Non-fatal problems met since the last call (cache I/O, mostly)
    fn drain_diagnostics(&self) -> Vec<Diagnostic> {
        Vec::new()
    }
}
