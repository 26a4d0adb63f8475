use super::http::{build_client, read_json, validate_url_component, with_retry};
use crate::inventory::domain::Vulnerability;
use crate::ports::outbound::{LatestVersionSource, VulnerabilitySource};
use crate::shared::error::LookupError;
use crate::shared::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct PyPiProject {
    info: PyPiInfo,
    #[serde(default)]
    vulnerabilities: Vec<PyPiVulnerability>,
}

#[derive(Debug, Deserialize)]
struct PyPiInfo {
    version: String,
}

#[derive(Debug, Deserialize)]
struct PyPiVulnerability {
    id: String,
    #[serde(default)]
    aliases: Vec<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    fixed_in: Vec<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    withdrawn: Option<String>,
}

impl From<PyPiVulnerability> for Vulnerability {
    fn from(v: PyPiVulnerability) -> Self {
        Vulnerability {
            id: v.id,
            aliases: v.aliases,
            summary: v.summary,
            details: v.details,
            fixed_in: v.fixed_in,
            link: v.link,
        }
    }
}

/// PyPiClient adapter for the PyPI JSON API
///
/// Answers both remote questions:
/// - latest version: `GET /pypi/<name>/json`, field `info.version`
/// - vulnerabilities: `GET /pypi/<name>/<version>/json`, field `vulnerabilities`
///   (withdrawn advisories are dropped)
///
/// # Async Support
/// Uses async reqwest client for non-blocking HTTP requests, enabling bounded
/// parallel lookups.
pub struct PyPiClient {
    client: reqwest::Client,
    base_url: String,
}

impl PyPiClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://pypi.org";
    const TIMEOUT_SECONDS: u64 = 10;

    /// Creates a new PyPI client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_base_url(Self::DEFAULT_BASE_URL)
    }

    /// Creates a client against another index (a mirror, or a test server)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = build_client(Duration::from_secs(Self::TIMEOUT_SECONDS))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_project(&self, url: &str, package_name: &str) -> Result<PyPiProject, LookupError> {
        with_retry(|| async {
            let response = self.client.get(url).send().await?;
            read_json::<PyPiProject>(response, package_name).await
        })
        .await
    }
}

// Note: Default implementation intentionally omitted.
// Client construction can fail; use PyPiClient::new() and handle the Result.

#[async_trait]
impl LatestVersionSource for PyPiClient {
    async fn fetch_latest_version(&self, package_name: &str) -> Result<String, LookupError> {
        // Security: Validate URL components before using them
        validate_url_component(package_name, "Package name")?;

        let url = format!(
            "{}/pypi/{}/json",
            self.base_url,
            urlencoding::encode(package_name)
        );
        let project = self.fetch_project(&url, package_name).await?;

        let version = project.info.version.trim().to_string();
        if version.is_empty() {
            return Err(LookupError::MalformedResponse {
                details: "info.version is empty".to_string(),
            });
        }
        Ok(version)
    }
}

#[async_trait]
impl VulnerabilitySource for PyPiClient {
    fn source_name(&self) -> &'static str {
        "pypi"
    }

    async fn fetch_vulnerabilities(
        &self,
        package_name: &str,
        version: &str,
    ) -> Result<Vec<Vulnerability>, LookupError> {
        validate_url_component(package_name, "Package name")?;
        validate_url_component(version, "Version")?;

        let url = format!(
            "{}/pypi/{}/{}/json",
            self.base_url,
            urlencoding::encode(package_name),
            urlencoding::encode(version)
        );
        let project = self.fetch_project(&url, package_name).await?;

        Ok(project
            .vulnerabilities
            .into_iter()
            .filter(|v| v.withdrawn.is_none())
            .map(Vulnerability::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pypi_client_creation() {
        assert!(PyPiClient::new().is_ok());
    }

    #[tokio::test]
    async fn test_fetch_latest_version() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/pypi/requests/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"info": {"name": "requests", "version": "2.32.3"}, "urls": []}"#)
            .create_async()
            .await;

        let client = PyPiClient::with_base_url(server.url()).unwrap();
        let version = client.fetch_latest_version("requests").await.unwrap();

        assert_eq!(version, "2.32.3");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unknown_package_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/pypi/no-such-package/json")
            .with_status(404)
            .expect(1)
            .create_async()
            .await;

        let client = PyPiClient::with_base_url(server.url()).unwrap();
        let result = client.fetch_latest_version("no-such-package").await;

        assert_eq!(
            result,
            Err(LookupError::NotFound {
                package: "no-such-package".to_string()
            })
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_is_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/pypi/flaky/json")
            .with_status(503)
            .expect(3)
            .create_async()
            .await;

        let client = PyPiClient::with_base_url(server.url()).unwrap();
        let result = client.fetch_latest_version("flaky").await;

        assert_eq!(result, Err(LookupError::Http { status: 503 }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/pypi/broken/json")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let client = PyPiClient::with_base_url(server.url()).unwrap();
        let result = client.fetch_latest_version("broken").await;
        assert!(matches!(result, Err(LookupError::MalformedResponse { .. })));
    }

    #[tokio::test]
    async fn test_fetch_vulnerabilities_skips_withdrawn() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/pypi/requests/2.31.0/json")
            .with_status(200)
            .with_body(
                r#"{
                    "info": {"version": "2.31.0"},
                    "vulnerabilities": [
                        {
                            "id": "GHSA-9wx4-h78v-vm56",
                            "aliases": ["CVE-2024-35195"],
                            "details": "Requests Session object does not verify requests after making first request with verify=False",
                            "fixed_in": ["2.32.0"],
                            "link": "https://osv.dev/vulnerability/GHSA-9wx4-h78v-vm56",
                            "withdrawn": null
                        },
                        {
                            "id": "PYSEC-0000-1",
                            "aliases": [],
                            "withdrawn": "2024-01-01T00:00:00Z"
                        }
                    ]
                }"#,
            )
            .create_async()
            .await;

        let client = PyPiClient::with_base_url(server.url()).unwrap();
        let vulns = client
            .fetch_vulnerabilities("requests", "2.31.0")
            .await
            .unwrap();

        assert_eq!(vulns.len(), 1);
        assert_eq!(vulns[0].id, "GHSA-9wx4-h78v-vm56");
        assert_eq!(vulns[0].display_id(), "CVE-2024-35195");
        assert_eq!(vulns[0].fixed_in, vec!["2.32.0".to_string()]);
    }

    #[tokio::test]
    async fn test_no_vulnerabilities_field_is_empty_list() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/pypi/six/1.16.0/json")
            .with_status(200)
            .with_body(r#"{"info": {"version": "1.16.0"}}"#)
            .create_async()
            .await;

        let client = PyPiClient::with_base_url(server.url()).unwrap();
        let vulns = client.fetch_vulnerabilities("six", "1.16.0").await.unwrap();
        assert!(vulns.is_empty());
    }

    #[tokio::test]
    async fn test_rejects_unsafe_components_without_request() {
        let client = PyPiClient::with_base_url("http://127.0.0.1:9").unwrap();
        let result = client.fetch_vulnerabilities("../admin", "1.0").await;
        assert!(matches!(result, Err(LookupError::InvalidComponent { .. })));
    }
}
