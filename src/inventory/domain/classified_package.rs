use super::{Fact, LookupStatus, PackageRecord, Version, Vulnerability};

/// Final verdict for one discovered record. Built once by the classifier, never mutated.
#[derive(Debug, Clone)]
pub struct ClassifiedPackage {
    record: PackageRecord,
    display_name: String,
    is_duplicate: bool,
    is_required: bool,
    latest: Fact<Version>,
    vulnerabilities: Fact<Vec<Vulnerability>>,
}

impl ClassifiedPackage {
    pub fn new(
        record: PackageRecord,
        display_name: String,
        is_duplicate: bool,
        is_required: bool,
        latest: Fact<Version>,
        vulnerabilities: Fact<Vec<Vulnerability>>,
    ) -> Self {
        Self {
            record,
            display_name,
            is_duplicate,
            is_required,
            latest,
            vulnerabilities,
        }
    }

    pub fn record(&self) -> &PackageRecord {
        &self.record
    }

    /// Spelling of the first record encountered for this normalized name.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn is_duplicate(&self) -> bool {
        self.is_duplicate
    }

    pub fn is_required(&self) -> bool {
        self.is_required
    }

    pub fn latest_version(&self) -> Option<&Version> {
        self.latest.value()
    }

    pub fn latest_status(&self) -> LookupStatus {
        self.latest.status()
    }

    /// `None` when the check was not run, the lookup failed, or the versions
    /// cannot be ordered.
    pub fn is_outdated(&self) -> Option<bool> {
        self.latest
            .value()
            .and_then(|latest| latest.is_newer_than(self.record.version()))
    }

    pub fn vulnerabilities(&self) -> Option<&[Vulnerability]> {
        self.vulnerabilities.value().map(Vec::as_slice)
    }

    pub fn vulnerability_status(&self) -> LookupStatus {
        self.vulnerabilities.status()
    }

    pub fn is_vulnerable(&self) -> Option<bool> {
        self.vulnerabilities.value().map(|v| !v.is_empty())
    }

    /// The latest-version check ran but produced no usable verdict.
    pub fn is_latest_unknown(&self) -> bool {
        self.latest.is_requested() && self.is_outdated().is_none()
    }

    pub fn is_vulnerability_unknown(&self) -> bool {
        self.vulnerabilities.is_requested() && self.is_vulnerable().is_none()
    }
}
