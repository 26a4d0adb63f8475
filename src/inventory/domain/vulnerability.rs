use serde::{Deserialize, Serialize};

/// A published advisory affecting an installed version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vulnerability {
    pub id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fixed_in: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Vulnerability {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            aliases: Vec::new(),
            summary: None,
            details: None,
            fixed_in: Vec::new(),
            link: None,
        }
    }

    /// The CVE alias when there is one, else the advisory id.
    pub fn display_id(&self) -> &str {
        self.aliases
            .iter()
            .find(|alias| alias.starts_with("CVE-"))
            .unwrap_or(&self.id)
    }

    /// One-line description: summary, else the first line of the details.
    pub fn headline(&self) -> Option<&str> {
        self.summary
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| {
                self.details
                    .as_deref()
                    .and_then(|d| d.lines().find(|l| !l.trim().is_empty()))
            })
            .map(str::trim)
    }
}
