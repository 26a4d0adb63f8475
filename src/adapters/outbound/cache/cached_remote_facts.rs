use super::LookupCache;
use crate::inventory::domain::{Diagnostic, PackageName, Version, Vulnerability};
use crate::ports::outbound::{
    CacheKey, CachePayload, CacheStore, Clock, LatestVersionSource, Lookup, RemoteFacts,
    VulnerabilitySource,
};
use crate::shared::error::LookupError;
use async_trait::async_trait;

/// RemoteFacts adapter answering from the [`LookupCache`], fetching through the
/// configured sources on a miss.
///
/// This is the decorator between the inventory and the network adapters: the
/// use case never knows whether an answer came from disk or from the index.
pub struct CachedRemoteFacts<S: CacheStore, C: Clock> {
    cache: LookupCache<S, C>,
    latest_source: Box<dyn LatestVersionSource>,
    vulnerability_source: Box<dyn VulnerabilitySource>,
}

impl<S: CacheStore, C: Clock> CachedRemoteFacts<S, C> {
    pub fn new(
        cache: LookupCache<S, C>,
        latest_source: Box<dyn LatestVersionSource>,
        vulnerability_source: Box<dyn VulnerabilitySource>,
    ) -> Self {
        Self {
            cache,
            latest_source,
            vulnerability_source,
        }
    }
}

fn unexpected_payload(payload: &CachePayload) -> LookupError {
    LookupError::MalformedResponse {
        details: format!("unexpected cached payload {:?}", payload),
    }
}

#[async_trait]
impl<S: CacheStore, C: Clock> RemoteFacts for CachedRemoteFacts<S, C> {
    async fn latest_version(&self, name: &PackageName) -> Result<Lookup<Version>, LookupError> {
        let normalized = name.normalized();
        let lookup = self
            .cache
            .lookup(CacheKey::latest_version(normalized), || async {
                let version = self.latest_source.fetch_latest_version(normalized).await?;
                Ok(CachePayload::LatestVersion { version })
            })
            .await?;

        let version = match &lookup.value {
            CachePayload::LatestVersion { version } => {
                Version::new(version.clone()).map_err(|e| LookupError::MalformedResponse {
                    details: e.to_string(),
                })?
            }
            other => return Err(unexpected_payload(other)),
        };
        Ok(lookup.map(|_| version))
    }

    async fn vulnerabilities(
        &self,
        name: &PackageName,
        version: &Version,
    ) -> Result<Lookup<Vec<Vulnerability>>, LookupError> {
        let normalized = name.normalized();
        let version = version.as_str();
        let key = CacheKey::vulnerabilities(
            self.vulnerability_source.source_name(),
            normalized,
            version,
        );
        let lookup = self
            .cache
            .lookup(key, || async {
                let items = self
                    .vulnerability_source
                    .fetch_vulnerabilities(normalized, version)
                    .await?;
                Ok(CachePayload::Vulnerabilities { items })
            })
            .await?;

        match lookup.value {
            CachePayload::Vulnerabilities { items } => Ok(Lookup {
                value: items,
                origin: lookup.origin,
            }),
            other => Err(unexpected_payload(&other)),
        }
    }

    fn drain_diagnostics(&self) -> Vec<Diagnostic> {
        self.cache
            .take_errors()
            .into_iter()
            .map(Diagnostic::from)
            .collect()
    }
}
