use super::QueryKind;
use crate::shared::error::{CacheError, LookupError, ParseError, ScanError};
use chrono::{DateTime, Utc};
use std::fmt;
use std::path::PathBuf;

/// A non-fatal problem met during a run, reported beside the inventory.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    Scan(ScanError),
    Parse(ParseError),
    Lookup {
        package: String,
        kind: QueryKind,
        error: LookupError,
    },
    /// A stale cache entry answered because the refetch failed.
    Degraded {
        package: String,
        kind: QueryKind,
        fetched_at: DateTime<Utc>,
        error: LookupError,
    },
    CacheIo(CacheError),
    DuplicateRecordSuppressed {
        kept: PathBuf,
        suppressed: PathBuf,
    },
}

impl Diagnostic {
    /// Whether the diagnostic is worth a warning, as opposed to debug output only.
    pub fn is_warning(&self) -> bool {
        !matches!(
            self,
            Diagnostic::DuplicateRecordSuppressed { .. } | Diagnostic::Degraded { .. }
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Scan(e) => write!(f, "scan: {}", e),
            Diagnostic::Parse(e) => write!(f, "parse: {}", e),
            Diagnostic::Lookup {
                package,
                kind,
                error,
            } => write!(f, "lookup {} for {}: {}", kind, package, error),
            Diagnostic::Degraded {
                package,
                kind,
                fetched_at,
                error,
            } => write!(
                f,
                "lookup {} for {}: using stale answer from {} ({})",
                kind,
                package,
                fetched_at.format("%Y-%m-%d %H:%M UTC"),
                error
            ),
            Diagnostic::CacheIo(e) => write!(f, "cache: {}", e),
            Diagnostic::DuplicateRecordSuppressed { kept, suppressed } => write!(
                f,
                "duplicate record {} ignored in favour of {}",
                suppressed.display(),
                kept.display()
            ),
        }
    }
}

impl From<ScanError> for Diagnostic {
    fn from(e: ScanError) -> Self {
        Diagnostic::Scan(e)
    }
}

impl From<ParseError> for Diagnostic {
    fn from(e: ParseError) -> Self {
        Diagnostic::Parse(e)
    }
}

impl From<CacheError> for Diagnostic {
    fn from(e: CacheError) -> Self {
        Diagnostic::CacheIo(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_diagnostic_display() {
        let diagnostic = Diagnostic::Lookup {
            package: "requests".to_string(),
            kind: QueryKind::LatestVersion,
            error: LookupError::Http { status: 503 },
        };
        let text = diagnostic.to_string();
        assert!(text.contains("latest_version"));
        assert!(text.contains("requests"));
        assert!(text.contains("503"));
        assert!(diagnostic.is_warning());
    }

    #[test]
    fn test_suppressed_duplicate_is_debug_only() {
        let diagnostic = Diagnostic::DuplicateRecordSuppressed {
            kept: PathBuf::from("/site/foo-1.0.dist-info"),
            suppressed: PathBuf::from("/site/foo-1.0.egg-info"),
        };
        assert!(!diagnostic.is_warning());
        assert!(diagnostic.to_string().contains("foo-1.0.egg-info"));
    }

    #[test]
    fn test_from_parse_error() {
        let diagnostic: Diagnostic = ParseError::MissingField {
            location: PathBuf::from("/site/bad.dist-info"),
            field: "Name".to_string(),
        }
        .into();
        assert!(matches!(diagnostic, Diagnostic::Parse(_)));
    }
}
