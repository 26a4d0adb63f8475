use super::{PackageName, Requirement, Version};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Whether an installation is visible to every user or only to the invoking one.
///
/// Declaration order is the output order: System sorts before User.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    System,
    User,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::System => write!(f, "system"),
            Scope::User => write!(f, "user"),
        }
    }
}

/// Identifies the runtime installation a package belongs to, e.g. `python3.12`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RuntimeBucket(String);

impl RuntimeBucket {
    pub const DEFAULT: &'static str = "default";

    pub fn new(bucket: impl Into<String>) -> Self {
        Self(bucket.into())
    }

    /// Derives the bucket from the first `pythonX.Y` component of a path.
    pub fn from_path(path: &Path) -> Self {
        path.components()
            .filter_map(|c| c.as_os_str().to_str())
            .find(|c| is_python_version_component(c))
            .map(|c| Self(c.to_string()))
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RuntimeBucket {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for RuntimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn is_python_version_component(component: &str) -> bool {
    let Some(rest) = component.strip_prefix("python") else {
        return false;
    };
    let mut parts = rest.split('.');
    let major = parts.next().unwrap_or_default();
    let minor = parts.next().unwrap_or_default();
    parts.next().is_none()
        && !major.is_empty()
        && !minor.is_empty()
        && major.chars().all(|c| c.is_ascii_digit())
        && minor.chars().all(|c| c.is_ascii_digit())
}

/// One discovered installation of a package.
///
/// `name`, `version` and `location` identify a record. Several records may share a
/// normalized name; they are all kept so shadowing stays visible.
#[derive(Debug, Clone, Serialize)]
pub struct PackageRecord {
    name: PackageName,
    version: Version,
    summary: String,
    scope: Scope,
    location: PathBuf,
    runtime_bucket: RuntimeBucket,
    requires: Vec<Requirement>,
}

impl PackageRecord {
    pub fn new(
        name: PackageName,
        version: Version,
        summary: Option<String>,
        scope: Scope,
        location: PathBuf,
        runtime_bucket: RuntimeBucket,
        requires: Vec<Requirement>,
    ) -> Self {
        Self {
            name,
            version,
            summary: summary.unwrap_or_default(),
            scope,
            location,
            runtime_bucket,
            requires,
        }
    }

    pub fn name(&self) -> &PackageName {
        &self.name
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn runtime_bucket(&self) -> &RuntimeBucket {
        &self.runtime_bucket
    }

    pub fn requires(&self) -> &[Requirement] {
        &self.requires
    }
}
