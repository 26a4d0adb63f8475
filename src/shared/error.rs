use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow scripts to distinguish between different
/// types of failures and successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - the inventory was produced (possibly with non-fatal diagnostics)
    Success = 0,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (no usable installation roots, bad config, output I/O error, etc.)
    ApplicationError = 3,
    /// The run was interrupted by the user (SIGINT)
    Interrupted = 130,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
            ExitCode::Interrupted => write!(f, "Interrupted (130)"),
        }
    }
}

/// Terminal errors for a pipinfo run.
///
/// Everything else the engine encounters is downgraded to a [`Diagnostic`]
/// and reported beside the inventory.
///
/// [`Diagnostic`]: crate::inventory::domain::Diagnostic
#[derive(Debug, Error)]
pub enum PipinfoError {
    #[error("No usable installation roots ({attempted} tried)\n\n💡 Hint: Pass site-packages directories explicitly, or check the configured interpreters")]
    NoUsableRoots { attempted: usize },

    #[error("Invalid config file: {path}\nReason: {reason}\n\n💡 Hint: {hint}")]
    InvalidConfig {
        path: PathBuf,
        reason: String,
        hint: String,
    },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Failed to query interpreter '{interpreter}': {details}")]
    SiteDiscovery {
        interpreter: String,
        details: String,
    },
}

/// An installation root could not be enumerated for a reason other than
/// not existing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScanError {
    #[error("Cannot read installation root {root}: {details}")]
    Unreadable { root: PathBuf, details: String },

    #[error("Installation root {root} is not a directory")]
    NotADirectory { root: PathBuf },
}

impl ScanError {
    pub fn root(&self) -> &Path {
        match self {
            ScanError::Unreadable { root, .. } | ScanError::NotADirectory { root } => root,
        }
    }
}

/// A single metadata record could not be turned into a package record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("{location}: expected metadata file '{expected}' is missing")]
    MissingMetadataFile { location: PathBuf, expected: String },

    #[error("{location}: cannot read metadata: {details}")]
    Unreadable { location: PathBuf, details: String },

    #[error("{location}: required header '{field}' is missing")]
    MissingField { location: PathBuf, field: String },

    #[error("{location}: header '{field}' is invalid: {details}")]
    InvalidField {
        location: PathBuf,
        field: String,
        details: String,
    },
}

impl ParseError {
    pub fn location(&self) -> &Path {
        match self {
            ParseError::MissingMetadataFile { location, .. }
            | ParseError::Unreadable { location, .. }
            | ParseError::MissingField { location, .. }
            | ParseError::InvalidField { location, .. } => location,
        }
    }
}

/// A remote lookup (latest version or vulnerabilities) failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("package '{package}' is not known to the index")]
    NotFound { package: String },

    #[error("index returned status code {status}")]
    Http { status: u16 },

    #[error("request failed: {details}")]
    Transport { details: String },

    #[error("malformed response: {details}")]
    MalformedResponse { details: String },

    #[error("Security: {details}")]
    InvalidComponent { details: String },
}

impl LookupError {
    /// Permanent failures are worth remembering in the cache; transient ones
    /// must be retried on the next run.
    pub fn is_permanent(&self) -> bool {
        matches!(self, LookupError::NotFound { .. })
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            LookupError::MalformedResponse {
                details: e.to_string(),
            }
        } else if let Some(status) = e.status() {
            LookupError::Http {
                status: status.as_u16(),
            }
        } else {
            LookupError::Transport {
                details: e.to_string(),
            }
        }
    }
}

/// The on-disk cache could not be read or written. Never fatal.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("cannot read cache entry {path}: {details}")]
    Read { path: PathBuf, details: String },

    #[error("cannot write cache entry {path}: {details}")]
    Write { path: PathBuf, details: String },

    #[error("discarding corrupt cache entry {path}: {details}")]
    Corrupt { path: PathBuf, details: String },
}
