use crate::shared::Result;
use serde::{Serialize, Serializer};
use std::fmt;

/// Maximum length for package names (security limit)
const MAX_PACKAGE_NAME_LENGTH: usize = 255;

/// Package name as declared in metadata, paired with its normalized identity.
///
/// Matching (duplicate detection, requirement lookups, cache keys) always goes through
/// [`PackageName::normalized`]; display keeps the spelling found on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageName {
    display: String,
    normalized: String,
}

impl PackageName {
    pub fn new(name: String) -> Result<Self> {
        let name = name.trim().to_string();
        if name.is_empty() {
            anyhow::bail!("Package name cannot be empty");
        }

        // Security: Length limit to prevent DoS
        if name.len() > MAX_PACKAGE_NAME_LENGTH {
            anyhow::bail!(
                "Package name is too long ({} bytes). Maximum allowed: {} bytes",
                name.len(),
                MAX_PACKAGE_NAME_LENGTH
            );
        }

        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        {
            anyhow::bail!(
                "Package name '{}' contains invalid characters. Only ASCII letters, digits, hyphens, underscores and dots are allowed.",
                name
            );
        }

        let normalized = Self::normalize(&name);
        Ok(Self {
            display: name,
            normalized,
        })
    }

    /// Folds case and collapses every run of `-`, `_` and `.` into a single `-`.
    ///
    /// Idempotent: `normalize(normalize(x)) == normalize(x)`.
    pub fn normalize(name: &str) -> String {
        let mut normalized = String::with_capacity(name.len());
        let mut in_separator = false;
        for c in name.trim().chars() {
            if matches!(c, '-' | '_' | '.') {
                if !in_separator {
                    normalized.push('-');
                }
                in_separator = true;
            } else {
                normalized.extend(c.to_lowercase());
                in_separator = false;
            }
        }
        normalized
    }

    pub fn as_str(&self) -> &str {
        &self.display
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// True when both names designate the same project.
    pub fn matches(&self, other: &PackageName) -> bool {
        self.normalized == other.normalized
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display)
    }
}

impl Serialize for PackageName {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.display)
    }
}
