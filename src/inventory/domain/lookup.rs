use serde::{Deserialize, Serialize};
use std::fmt;

/// The two remote questions the engine can ask about a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    LatestVersion,
    Vulnerabilities,
}

impl QueryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::LatestVersion => "latest_version",
            QueryKind::Vulnerabilities => "vulnerabilities",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a remote fact was obtained, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupStatus {
    /// The check was not enabled for this run.
    NotRequested,
    /// Answered from a fresh cache entry or a successful fetch.
    Fresh,
    /// The fetch failed and a stale cache entry was substituted.
    Degraded,
    /// No answer: the facet is unknown.
    Failed,
}

/// A remote fact together with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Fact<T> {
    value: Option<T>,
    status: LookupStatus,
}

impl<T> Fact<T> {
    pub fn not_requested() -> Self {
        Self {
            value: None,
            status: LookupStatus::NotRequested,
        }
    }

    pub fn fresh(value: T) -> Self {
        Self {
            value: Some(value),
            status: LookupStatus::Fresh,
        }
    }

    pub fn degraded(value: T) -> Self {
        Self {
            value: Some(value),
            status: LookupStatus::Degraded,
        }
    }

    pub fn failed() -> Self {
        Self {
            value: None,
            status: LookupStatus::Failed,
        }
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn status(&self) -> LookupStatus {
        self.status
    }

    pub fn is_requested(&self) -> bool {
        self.status != LookupStatus::NotRequested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fact_constructors() {
        assert_eq!(Fact::<u8>::not_requested().value(), None);
        assert!(!Fact::<u8>::not_requested().is_requested());
        assert_eq!(Fact::fresh(1).value(), Some(&1));
        assert_eq!(Fact::degraded(2).status(), LookupStatus::Degraded);
        assert_eq!(Fact::<u8>::failed().value(), None);
        assert!(Fact::<u8>::failed().is_requested());
    }

    #[test]
    fn test_query_kind_names() {
        assert_eq!(QueryKind::LatestVersion.to_string(), "latest_version");
        assert_eq!(QueryKind::Vulnerabilities.as_str(), "vulnerabilities");
    }
}
