use async_trait::async_trait;
use pipinfo::prelude::*;
use pipinfo::shared::error::LookupError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Mock RemoteFacts answering from fixed tables
///
/// Names missing from a table fail with a transport error, like an unreachable index.
#[derive(Default)]
pub struct MockRemoteFacts {
    latest: HashMap<String, String>,
    vulnerabilities: HashMap<(String, String), Vec<Vulnerability>>,
    calls: AtomicUsize,
}

impl MockRemoteFacts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latest(mut self, name: &str, version: &str) -> Self {
        self.latest
            .insert(PackageName::normalize(name), version.to_string());
        self
    }

    pub fn with_vulnerability(mut self, name: &str, version: &str, id: &str) -> Self {
        self.vulnerabilities
            .entry((PackageName::normalize(name), version.to_string()))
            .or_default()
            .push(Vulnerability::new(id));
        self
    }

    pub fn with_no_vulnerabilities(mut self, name: &str, version: &str) -> Self {
        self.vulnerabilities
            .entry((PackageName::normalize(name), version.to_string()))
            .or_default();
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn unreachable() -> LookupError {
        LookupError::Transport {
            details: "connection refused".to_string(),
        }
    }
}

#[async_trait]
impl RemoteFacts for MockRemoteFacts {
    async fn latest_version(&self, name: &PackageName) -> Result<Lookup<Version>, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let version = self
            .latest
            .get(name.normalized())
            .ok_or_else(Self::unreachable)?;
        Ok(Lookup {
            value: Version::new(version.clone()).map_err(|_| Self::unreachable())?,
            origin: LookupOrigin::Remote,
        })
    }

    async fn vulnerabilities(
        &self,
        name: &PackageName,
        version: &Version,
    ) -> Result<Lookup<Vec<Vulnerability>>, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let key = (name.normalized().to_string(), version.as_str().to_string());
        let vulnerabilities = self
            .vulnerabilities
            .get(&key)
            .ok_or_else(Self::unreachable)?;
        Ok(Lookup {
            value: vulnerabilities.clone(),
            origin: LookupOrigin::Remote,
        })
    }
}
