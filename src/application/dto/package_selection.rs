use crate::inventory::domain::{ClassifiedPackage, Scope};

/// Report filters applied after classification.
///
/// Each facet is a tri-state: `None` keeps everything, `Some(true)` keeps the
/// packages where the facet holds, `Some(false)` those where it is known not
/// to hold. A package whose facet is unknown is dropped by both sides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageSelection {
    pub scope: Option<Scope>,
    pub outdated: Option<bool>,
    pub vulnerable: Option<bool>,
    pub required: Option<bool>,
    /// Outdated or vulnerable
    pub issues: bool,
}

impl PackageSelection {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Selecting on the outdated facet needs the latest-version check.
    pub fn needs_latest_check(&self) -> bool {
        self.outdated.is_some() || self.issues
    }

    pub fn needs_vulnerability_check(&self) -> bool {
        self.vulnerable.is_some() || self.issues
    }

    pub fn matches(&self, package: &ClassifiedPackage) -> bool {
        if let Some(scope) = self.scope {
            if package.record().scope() != scope {
                return false;
            }
        }
        if !Self::facet_matches(self.outdated, package.is_outdated()) {
            return false;
        }
        if !Self::facet_matches(self.vulnerable, package.is_vulnerable()) {
            return false;
        }
        if !Self::facet_matches(self.required, Some(package.is_required())) {
            return false;
        }
        if self.issues {
            return package.is_outdated() == Some(true) || package.is_vulnerable() == Some(true);
        }
        true
    }

    fn facet_matches(wanted: Option<bool>, actual: Option<bool>) -> bool {
        match wanted {
            None => true,
            Some(wanted) => actual == Some(wanted),
        }
    }
}
