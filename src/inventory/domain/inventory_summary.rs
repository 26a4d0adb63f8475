use super::{ClassifiedPackage, Scope};
use serde::Serialize;

/// Aggregate counts handed to the rendering layer beside the package list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InventorySummary {
    pub total: usize,
    pub system: usize,
    pub user: usize,
    pub duplicates: usize,
    pub outdated: usize,
    pub vulnerable: usize,
    pub required: usize,
    pub not_required: usize,
    pub unknown_latest: usize,
    pub unknown_vulnerabilities: usize,
}

impl InventorySummary {
    pub fn from_packages(packages: &[ClassifiedPackage]) -> Self {
        packages
            .iter()
            .fold(Self::default(), |mut summary, package| {
                summary.total += 1;
                match package.record().scope() {
                    Scope::System => summary.system += 1,
                    Scope::User => summary.user += 1,
                }
                if package.is_duplicate() {
                    summary.duplicates += 1;
                }
                if package.is_outdated() == Some(true) {
                    summary.outdated += 1;
                }
                if package.is_vulnerable() == Some(true) {
                    summary.vulnerable += 1;
                }
                if package.is_required() {
                    summary.required += 1;
                } else {
                    summary.not_required += 1;
                }
                if package.is_latest_unknown() {
                    summary.unknown_latest += 1;
                }
                if package.is_vulnerability_unknown() {
                    summary.unknown_vulnerabilities += 1;
                }
                summary
            })
    }

    /// Packages with at least one unknown facet are counted once per facet.
    pub fn unknown(&self) -> usize {
        self.unknown_latest + self.unknown_vulnerabilities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::domain::{
        Fact, PackageName, PackageRecord, RuntimeBucket, Version, Vulnerability,
    };
    use std::path::PathBuf;

    fn package(
        name: &str,
        scope: Scope,
        duplicate: bool,
        required: bool,
        latest: Fact<Version>,
        vulns: Fact<Vec<Vulnerability>>,
    ) -> ClassifiedPackage {
        let record = PackageRecord::new(
            PackageName::new(name.to_string()).unwrap(),
            Version::new("1.0".to_string()).unwrap(),
            None,
            scope,
            PathBuf::from(format!("/site/{}.dist-info", name)),
            RuntimeBucket::default(),
            vec![],
        );
        ClassifiedPackage::new(
            record,
            name.to_string(),
            duplicate,
            required,
            latest,
            vulns,
        )
    }

    #[test]
    fn test_summary_counts_every_facet() {
        let packages = vec![
            package(
                "a",
                Scope::System,
                true,
                true,
                Fact::fresh(Version::new("2.0".to_string()).unwrap()),
                Fact::fresh(vec![Vulnerability::new("CVE-1")]),
            ),
            package(
                "a",
                Scope::User,
                true,
                true,
                Fact::failed(),
                Fact::fresh(vec![]),
            ),
            package(
                "b",
                Scope::User,
                false,
                false,
                Fact::fresh(Version::new("1.0".to_string()).unwrap()),
                Fact::failed(),
            ),
        ];

        let summary = InventorySummary::from_packages(&packages);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.system, 1);
        assert_eq!(summary.user, 2);
        assert_eq!(summary.duplicates, 2);
        assert_eq!(summary.outdated, 1);
        assert_eq!(summary.vulnerable, 1);
        assert_eq!(summary.required, 2);
        assert_eq!(summary.not_required, 1);
        assert_eq!(summary.unknown_latest, 1);
        assert_eq!(summary.unknown_vulnerabilities, 1);
        assert_eq!(summary.unknown(), 2);
    }

    #[test]
    fn test_empty_summary() {
        assert_eq!(InventorySummary::from_packages(&[]), InventorySummary::default());
    }
}
