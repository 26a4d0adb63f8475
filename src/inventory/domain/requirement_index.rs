use super::PackageRecord;
use std::collections::{BTreeMap, BTreeSet};

/// Reverse requirement map: normalized package name to the normalized names of the
/// installed packages that declare a requirement on it.
///
/// Built once from the complete record set, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementIndex {
    required_by: BTreeMap<String, BTreeSet<String>>,
}

impl RequirementIndex {
    pub fn build<'a>(records: impl IntoIterator<Item = &'a PackageRecord>) -> Self {
        let mut required_by: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for record in records {
            for requirement in record.requires() {
                if !requirement.is_applicable() {
                    continue;
                }
                required_by
                    .entry(requirement.normalized_name())
                    .or_default()
                    .insert(record.name().normalized().to_string());
            }
        }

        Self { required_by }
    }

    /// True when at least one installed package requires `normalized_name`.
    pub fn is_required(&self, normalized_name: &str) -> bool {
        self.required_by
            .get(normalized_name)
            .is_some_and(|requirers| !requirers.is_empty())
    }

    pub fn required_by(&self, normalized_name: &str) -> Option<&BTreeSet<String>> {
        self.required_by.get(normalized_name)
    }

    pub fn len(&self) -> usize {
        self.required_by.len()
    }

    pub fn is_empty(&self) -> bool {
        self.required_by.is_empty()
    }
}
