use crate::inventory::domain::{
    ClassifiedPackage, Fact, PackageRecord, RequirementIndex, Version, Vulnerability,
};
use std::collections::HashMap;

/// Merges local facts (duplicates, requirement index) and remote facts into verdicts.
///
/// Built once over the complete deduplicated record set, so duplicate counts and
/// display names do not depend on classification order.
pub struct Classifier<'a> {
    index: &'a RequirementIndex,
    name_counts: HashMap<String, usize>,
    display_names: HashMap<String, String>,
}

impl<'a> Classifier<'a> {
    /// # Arguments
    /// * `records` - Every record of the inventory, in discovery order
    /// * `index` - Requirement index built from the same records
    pub fn new(records: &[PackageRecord], index: &'a RequirementIndex) -> Self {
        let mut name_counts: HashMap<String, usize> = HashMap::new();
        let mut display_names: HashMap<String, String> = HashMap::new();

        for record in records {
            let normalized = record.name().normalized();
            *name_counts.entry(normalized.to_string()).or_insert(0) += 1;
            display_names
                .entry(normalized.to_string())
                .or_insert_with(|| record.name().as_str().to_string());
        }

        Self {
            index,
            name_counts,
            display_names,
        }
    }

    pub fn classify(
        &self,
        record: PackageRecord,
        latest: Fact<Version>,
        vulnerabilities: Fact<Vec<Vulnerability>>,
    ) -> ClassifiedPackage {
        let normalized = record.name().normalized();
        let is_duplicate = self.name_counts.get(normalized).copied().unwrap_or(0) > 1;
        let is_required = self.index.is_required(normalized);
        let display_name = self
            .display_names
            .get(normalized)
            .cloned()
            .unwrap_or_else(|| record.name().as_str().to_string());

        ClassifiedPackage::new(
            record,
            display_name,
            is_duplicate,
            is_required,
            latest,
            vulnerabilities,
        )
    }

    /// Final deterministic order: normalized name, then System before User, then
    /// runtime bucket and location so the order is total.
    pub fn sort(packages: &mut [ClassifiedPackage]) {
        packages.sort_by(|a, b| {
            let (a, b) = (a.record(), b.record());
            a.name()
                .normalized()
                .cmp(b.name().normalized())
                .then(a.scope().cmp(&b.scope()))
                .then_with(|| a.runtime_bucket().cmp(b.runtime_bucket()))
                .then_with(|| a.location().cmp(b.location()))
        });
    }
}
