use crate::application::dto::InventoryResponse;
use crate::inventory::domain::{
    ClassifiedPackage, InventorySummary, LookupStatus, Requirement, Scope, Version, Vulnerability,
};
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct Report<'a> {
    packages: Vec<PackageEntry<'a>>,
    summary: &'a InventorySummary,
}

#[derive(Debug, Serialize)]
struct PackageEntry<'a> {
    name: &'a str,
    normalized_name: &'a str,
    version: &'a Version,
    summary: &'a str,
    scope: Scope,
    runtime: &'a str,
    location: &'a Path,
    duplicate: bool,
    required: bool,
    requires: &'a [Requirement],
    latest: FacetEntry<&'a Version>,
    outdated: Option<bool>,
    vulnerabilities: FacetEntry<&'a [Vulnerability]>,
    vulnerable: Option<bool>,
}

#[derive(Debug, Serialize)]
struct FacetEntry<V> {
    status: LookupStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<V>,
}

impl<'a> PackageEntry<'a> {
    fn from_package(package: &'a ClassifiedPackage) -> Self {
        let record = package.record();
        Self {
            name: package.display_name(),
            normalized_name: record.name().normalized(),
            version: record.version(),
            summary: record.summary(),
            scope: record.scope(),
            runtime: record.runtime_bucket().as_str(),
            location: record.location(),
            duplicate: package.is_duplicate(),
            required: package.is_required(),
            requires: record.requires(),
            latest: FacetEntry {
                status: package.latest_status(),
                value: package.latest_version(),
            },
            outdated: package.is_outdated(),
            vulnerabilities: FacetEntry {
                status: package.vulnerability_status(),
                value: package.vulnerabilities(),
            },
            vulnerable: package.is_vulnerable(),
        }
    }
}

/// JsonFormatter adapter rendering `{ "packages": [...], "summary": {...} }`
///
/// Field order follows the struct declarations, so the output is stable
/// across runs for identical input.
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, response: &InventoryResponse) -> Result<String> {
        let report = Report {
            packages: response
                .packages
                .iter()
                .map(PackageEntry::from_package)
                .collect(),
            summary: &response.summary,
        };
        let mut json = serde_json::to_string_pretty(&report)?;
        json.push('\n');
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::domain::{Fact, PackageName, PackageRecord, RuntimeBucket};
    use std::path::PathBuf;

    fn package(name: &str, latest: Fact<Version>, vulns: Fact<Vec<Vulnerability>>) -> ClassifiedPackage {
        let record = PackageRecord::new(
            PackageName::new(name.to_string()).unwrap(),
            Version::new("1.0.0".to_string()).unwrap(),
            Some("A demo package".to_string()),
            Scope::User,
            PathBuf::from(format!("/site/{}-1.0.0.dist-info", name)),
            RuntimeBucket::new("python3.12"),
            vec![],
        );
        ClassifiedPackage::new(record, name.to_string(), false, true, latest, vulns)
    }

    #[test]
    fn test_json_document_shape() {
        let response = InventoryResponse::new(
            vec![package(
                "Requests",
                Fact::fresh(Version::new("2.0.0".to_string()).unwrap()),
                Fact::fresh(vec![Vulnerability::new("PYSEC-2023-74")]),
            )],
            vec![],
        );

        let output = JsonFormatter::new().format(&response).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        let entry = &json["packages"][0];
        assert_eq!(entry["name"], "Requests");
        assert_eq!(entry["normalized_name"], "requests");
        assert_eq!(entry["version"], "1.0.0");
        assert_eq!(entry["scope"], "user");
        assert_eq!(entry["runtime"], "python3.12");
        assert_eq!(entry["required"], true);
        assert_eq!(entry["latest"]["status"], "fresh");
        assert_eq!(entry["latest"]["value"], "2.0.0");
        assert_eq!(entry["outdated"], true);
        assert_eq!(entry["vulnerabilities"]["value"][0]["id"], "PYSEC-2023-74");
        assert_eq!(entry["vulnerable"], true);

        assert_eq!(json["summary"]["total"], 1);
        assert_eq!(json["summary"]["outdated"], 1);
        assert_eq!(json["summary"]["vulnerable"], 1);
    }

    #[test]
    fn test_unknown_facets_are_null() {
        let response = InventoryResponse::new(
            vec![package("six", Fact::failed(), Fact::not_requested())],
            vec![],
        );

        let output = JsonFormatter::new().format(&response).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        let entry = &json["packages"][0];
        assert_eq!(entry["latest"]["status"], "failed");
        assert!(entry["latest"].get("value").is_none());
        assert!(entry["outdated"].is_null());
        assert_eq!(entry["vulnerabilities"]["status"], "not_requested");
        assert_eq!(json["summary"]["unknown_latest"], 1);
    }

    #[test]
    fn test_output_is_deterministic() {
        let response = InventoryResponse::new(
            vec![
                package("alpha", Fact::not_requested(), Fact::not_requested()),
                package("beta", Fact::not_requested(), Fact::not_requested()),
            ],
            vec![],
        );
        let formatter = JsonFormatter::new();
        assert_eq!(
            formatter.format(&response).unwrap(),
            formatter.format(&response).unwrap()
        );
    }
}
