use super::http::{build_client, read_json, validate_url_component, with_retry};
use crate::inventory::domain::Vulnerability;
use crate::ports::outbound::VulnerabilitySource;
use crate::shared::error::LookupError;
use crate::shared::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct OsvQuery<'a> {
    package: OsvPackage<'a>,
    version: &'a str,
}

#[derive(Debug, Serialize)]
struct OsvPackage<'a> {
    name: &'a str,
    ecosystem: &'static str,
}

#[derive(Debug, Deserialize)]
struct OsvResponse {
    #[serde(default)]
    vulns: Vec<OsvVulnerability>,
}

#[derive(Debug, Deserialize)]
struct OsvVulnerability {
    id: String,
    #[serde(default)]
    aliases: Vec<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    affected: Vec<OsvAffected>,
    #[serde(default)]
    withdrawn: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OsvAffected {
    #[serde(default)]
    ranges: Vec<OsvRange>,
}

#[derive(Debug, Deserialize)]
struct OsvRange {
    #[serde(default)]
    events: Vec<OsvEvent>,
}

#[derive(Debug, Deserialize)]
struct OsvEvent {
    #[serde(default)]
    fixed: Option<String>,
}

impl OsvVulnerability {
    fn into_domain(self) -> Vulnerability {
        let fixed_in = self
            .affected
            .iter()
            .flat_map(|a| &a.ranges)
            .flat_map(|r| &r.events)
            .find_map(|e| e.fixed.clone())
            .into_iter()
            .collect();
        let link = Some(format!("https://osv.dev/vulnerability/{}", self.id));

        Vulnerability {
            id: self.id,
            aliases: self.aliases,
            summary: self.summary,
            details: self.details,
            fixed_in,
            link,
        }
    }
}

/// OSV API client for fetching vulnerability data
///
/// Uses the single-package query endpoint (`POST /v1/query`, ecosystem `PyPI`), which
/// returns full advisories, so no follow-up detail requests are needed.
///
/// # Security
/// - Validates package name and version before building the request
/// - Implements timeout (30 seconds)
/// - Retries transient failures only
pub struct OsvClient {
    client: reqwest::Client,
    api_url: String,
}

impl OsvClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.osv.dev";
    const TIMEOUT_SECONDS: u64 = 30;
    const ECOSYSTEM: &'static str = "PyPI";

    /// Creates a new OSV API client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_base_url(Self::DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = build_client(Duration::from_secs(Self::TIMEOUT_SECONDS))?;
        let base_url = base_url.into();
        Ok(Self {
            client,
            api_url: format!("{}/v1/query", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl VulnerabilitySource for OsvClient {
    fn source_name(&self) -> &'static str {
        "osv"
    }

    async fn fetch_vulnerabilities(
        &self,
        package_name: &str,
        version: &str,
    ) -> Result<Vec<Vulnerability>, LookupError> {
        validate_url_component(package_name, "Package name")?;
        validate_url_component(version, "Version")?;

        let query = OsvQuery {
            package: OsvPackage {
                name: package_name,
                ecosystem: Self::ECOSYSTEM,
            },
            version,
        };

        let response: OsvResponse = with_retry(|| async {
            let response = self.client.post(&self.api_url).json(&query).send().await?;
            read_json::<OsvResponse>(response, package_name).await
        })
        .await?;

        Ok(response
            .vulns
            .into_iter()
            .filter(|v| v.withdrawn.is_none())
            .map(OsvVulnerability::into_domain)
            .collect())
    }
}
