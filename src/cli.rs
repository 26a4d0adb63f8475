use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

use crate::application::dto::{OutputFormat, PackageSelection};
use crate::config::VulnerabilitySourceKind;
use crate::inventory::domain::Scope;

/// Scope given to directories passed on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ScopeArg {
    #[default]
    User,
    System,
}

impl From<ScopeArg> for Scope {
    fn from(scope: ScopeArg) -> Self {
        match scope {
            ScopeArg::User => Scope::User,
            ScopeArg::System => Scope::System,
        }
    }
}

/// List installed Python packages, flagging duplicate, outdated, vulnerable
/// and unrequired ones
#[derive(Parser, Debug)]
#[command(name = "pipinfo")]
#[command(version, disable_version_flag = true)]
#[command(
    about = "List installed Python packages, flagging duplicate, outdated, vulnerable and unrequired ones",
    long_about = None
)]
pub struct Args {
    /// site-packages directories to scan instead of the interpreters' own
    #[arg(value_name = "DIRECTORY")]
    pub directories: Vec<PathBuf>,

    /// Scope of the directories given on the command line
    #[arg(long, value_enum, default_value_t = ScopeArg::User)]
    pub scope: ScopeArg,

    /// Python interpreter(s) to query for site-packages directories
    #[arg(long = "interpreter", value_name = "COMMAND")]
    pub interpreters: Vec<String>,

    // Checks
    /// Check latest versions
    #[arg(short = 'l', long)]
    pub check_latest: bool,

    /// Check vulnerabilities
    #[arg(short = 'v', long = "check-vulns")]
    pub check_vulnerabilities: bool,

    /// Service answering vulnerability lookups
    #[arg(long, value_enum)]
    pub vulnerability_source: Option<VulnerabilitySourceKind>,

    // Display
    /// Toggle off color output
    #[arg(short = 'c', long)]
    pub no_color: bool,

    /// Toggle off progress meter
    #[arg(short = 'p', long)]
    pub no_progress: bool,

    /// Print detailed info on versions and vulnerabilities
    #[arg(short = 'i', long)]
    pub info: bool,

    /// Output format: table or json
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    // Selections
    /// Select only system packages
    #[arg(short = 'S', long, conflicts_with = "user")]
    pub system: bool,

    /// Select only user packages
    #[arg(short = 'U', long)]
    pub user: bool,

    /// Select only outdated packages
    #[arg(short = 'O', long, conflicts_with = "latest")]
    pub outdated: bool,

    /// Select only up-to-date packages
    #[arg(short = 'L', long, visible_alias = "uptodate")]
    pub latest: bool,

    /// Select only vulnerable packages
    #[arg(short = 'V', long, conflicts_with = "healthy")]
    pub vulnerable: bool,

    /// Select only healthy packages
    #[arg(short = 'H', long, visible_alias = "sane")]
    pub healthy: bool,

    /// Select all packages with issues (outdated or vulnerable)
    #[arg(short = 'I', long, conflicts_with_all = ["outdated", "latest", "vulnerable", "healthy"])]
    pub issues: bool,

    /// Select only packages required by another installed package
    #[arg(short = 'R', long, conflicts_with = "not_required")]
    pub required: bool,

    /// Select only packages nothing else requires
    #[arg(short = 'N', long)]
    pub not_required: bool,

    // Cache and configuration
    /// Configuration file (defaults to config.yml in the platform config directory)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding cached lookups
    #[arg(long, env = "PIPINFO_CACHE_DIR", value_name = "PATH")]
    pub cache_dir: Option<PathBuf>,

    /// Maximum number of concurrent remote lookups
    #[arg(short = 'j', long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..=64))]
    pub jobs: Option<u16>,

    /// Package index base URL
    #[arg(long, env = "PIPINFO_INDEX_URL", hide = true)]
    pub index_url: Option<String>,

    /// OSV API base URL
    #[arg(long, env = "PIPINFO_OSV_URL", hide = true)]
    pub osv_url: Option<String>,

    // Misc
    /// Enable debug logging and print every diagnostic
    #[arg(long, env = "PIPINFO_DEBUG", value_parser = clap::builder::FalseyValueParser::new())]
    pub debug: bool,

    /// Print version
    #[arg(long, action = ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Report filters requested on the command line
    pub fn selection(&self) -> PackageSelection {
        PackageSelection {
            scope: pick(self.system, self.user).map(|system| {
                if system {
                    Scope::System
                } else {
                    Scope::User
                }
            }),
            outdated: pick(self.outdated, self.latest),
            vulnerable: pick(self.vulnerable, self.healthy),
            required: pick(self.required, self.not_required),
            issues: self.issues,
        }
    }
}

/// `Some(true)` for the first flag, `Some(false)` for the second, `None` for neither.
fn pick(yes: bool, no: bool) -> Option<bool> {
    match (yes, no) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("pipinfo").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert!(args.directories.is_empty());
        assert_eq!(args.scope, ScopeArg::User);
        assert_eq!(args.format, OutputFormat::Table);
        assert!(!args.check_latest);
        assert!(args.selection().is_empty());
    }

    #[test]
    fn test_short_flags() {
        let args = parse(&["-lvcpi", "-S", "-O", "-N", "/tmp/site-packages"]);
        assert!(args.check_latest);
        assert!(args.check_vulnerabilities);
        assert!(args.no_color);
        assert!(args.no_progress);
        assert!(args.info);
        assert_eq!(args.directories, vec![PathBuf::from("/tmp/site-packages")]);

        let selection = args.selection();
        assert_eq!(selection.scope, Some(Scope::System));
        assert_eq!(selection.outdated, Some(true));
        assert_eq!(selection.required, Some(false));
        assert!(selection.needs_latest_check());
    }

    #[test]
    fn test_aliases() {
        let selection = parse(&["--uptodate", "--sane"]).selection();
        assert_eq!(selection.outdated, Some(false));
        assert_eq!(selection.vulnerable, Some(false));
    }

    #[test]
    fn test_conflicting_selections_are_rejected() {
        for pair in [
            ["--user", "--system"],
            ["--outdated", "--latest"],
            ["--vulnerable", "--healthy"],
            ["--required", "--not-required"],
            ["--issues", "--outdated"],
        ] {
            let result =
                Args::try_parse_from(std::iter::once("pipinfo").chain(pair.iter().copied()));
            assert!(result.is_err(), "{:?} should conflict", pair);
        }
    }

    #[test]
    fn test_issues_selection() {
        let selection = parse(&["-I"]).selection();
        assert!(selection.issues);
        assert!(selection.needs_latest_check());
        assert!(selection.needs_vulnerability_check());
    }

    #[test]
    fn test_format_and_jobs() {
        let args = parse(&["--format", "json", "-j", "16", "--vulnerability-source", "osv"]);
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.jobs, Some(16));
        assert_eq!(args.vulnerability_source, Some(VulnerabilitySourceKind::Osv));

        assert!(Args::try_parse_from(["pipinfo", "-j", "0"]).is_err());
        assert!(Args::try_parse_from(["pipinfo", "--format", "markdown"]).is_err());
    }

    #[test]
    fn test_explicit_scope() {
        let args = parse(&["--scope", "system", "/opt/site-packages"]);
        assert_eq!(Scope::from(args.scope), Scope::System);
    }
}
