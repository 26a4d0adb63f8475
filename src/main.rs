use pipinfo::adapters::outbound::cache::{
    CachedRemoteFacts, LookupCache, SystemClock, DEFAULT_TTL_HOURS,
};
use pipinfo::adapters::outbound::console::{SilentProgressReporter, StderrProgressReporter};
use pipinfo::adapters::outbound::filesystem::{FileCacheStore, FileSystemReader};
use pipinfo::adapters::outbound::network::{OsvClient, PyPiClient};
use pipinfo::adapters::outbound::python::PythonSiteLocator;
use pipinfo::application::dto::{
    InventoryRequest, InventoryResponse, DEFAULT_MAX_CONCURRENT_LOOKUPS,
};
use pipinfo::application::factories::{
    FormatterFactory, FormatterOptions, PresenterFactory, PresenterType,
};
use pipinfo::application::use_cases::TakeInventoryUseCase;
use pipinfo::cli::Args;
use pipinfo::config::{self, ConfigFile, VulnerabilitySourceKind};
use pipinfo::inventory::domain::{Diagnostic, InstallRoot};
use pipinfo::ports::outbound::{
    OutputPresenter, ProgressReporter, RemoteFacts, ReportFormatter, SiteLocator,
    VulnerabilitySource,
};
use pipinfo::shared::error::ExitCode;
use pipinfo::shared::Result;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_INTERPRETER: &str = "python3";

/// Effective settings: command-line flags over the config file over defaults.
#[derive(Debug)]
struct Settings {
    check_latest: bool,
    check_vulnerabilities: bool,
    color: bool,
    progress: bool,
    cache_dir: PathBuf,
    cache_ttl_hours: u64,
    max_concurrent_lookups: usize,
    vulnerability_source: VulnerabilitySourceKind,
    interpreters: Vec<String>,
}

impl Settings {
    fn merge(args: &Args, config: ConfigFile) -> Self {
        let selection = args.selection();
        let cache_dir = config::resolve_cache_dir(args.cache_dir.as_deref(), &config);
        let interpreters = if args.interpreters.is_empty() {
            config
                .interpreters
                .unwrap_or_else(|| vec![DEFAULT_INTERPRETER.to_string()])
        } else {
            args.interpreters.clone()
        };

        Self {
            check_latest: args.check_latest
                || selection.needs_latest_check()
                || config.check_latest.unwrap_or(false),
            check_vulnerabilities: args.check_vulnerabilities
                || selection.needs_vulnerability_check()
                || config.check_vulnerabilities.unwrap_or(false),
            color: !args.no_color
                && config.color.unwrap_or(true)
                && args.output.is_none()
                && std::io::stdout().is_terminal(),
            progress: !args.no_progress
                && config.progress.unwrap_or(true)
                && std::io::stderr().is_terminal(),
            cache_dir,
            cache_ttl_hours: config.cache_ttl_hours.unwrap_or(DEFAULT_TTL_HOURS),
            max_concurrent_lookups: args
                .jobs
                .map(usize::from)
                .or(config.max_concurrent_lookups)
                .unwrap_or(DEFAULT_MAX_CONCURRENT_LOOKUPS),
            vulnerability_source: args
                .vulnerability_source
                .or(config.vulnerability_source)
                .unwrap_or_default(),
            interpreters,
        }
    }
}

/// Log level is controlled by:
/// 1. `--debug` (or `PIPINFO_DEBUG`) sets `pipinfo=debug`
/// 2. `RUST_LOG` if set
/// 3. Default is `pipinfo=warn`
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("pipinfo=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pipinfo=warn"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(std::io::stderr().is_terminal())
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() {
    let args = Args::parse_args();
    init_tracing(args.debug);
    tracing::debug!("pipinfo starting with args: {:?}", args);

    let exit_code = tokio::select! {
        result = run(args) => match result {
            Ok(()) => ExitCode::Success,
            Err(e) => {
                report_error(&e);
                ExitCode::ApplicationError
            }
        },
        _ = tokio::signal::ctrl_c() => {
            eprintln!(" Interrupted!");
            ExitCode::Interrupted
        }
    };

    process::exit(exit_code.as_i32());
}

fn report_error(e: &anyhow::Error) {
    eprintln!("\n❌ An error occurred:\n");
    eprintln!("{}", e);

    // Display error chain
    let mut source = e.source();
    while let Some(err) = source {
        eprintln!("\nCaused by: {}", err);
        source = err.source();
    }
    eprintln!();
}

async fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    let settings = Settings::merge(&args, config);
    tracing::debug!("effective settings: {:?}", settings);

    let roots = resolve_roots(&args, &settings).await;
    let request = InventoryRequest::new(roots)
        .with_latest_check(settings.check_latest)
        .with_vulnerability_check(settings.check_vulnerabilities)
        .with_max_concurrent_lookups(settings.max_concurrent_lookups);

    let remote_facts = build_remote_facts(&args, &settings)?;
    let response = if settings.progress {
        take_inventory(StderrProgressReporter::new(), remote_facts, request).await?
    } else {
        take_inventory(SilentProgressReporter::new(), remote_facts, request).await?
    };

    report_warnings(&response);

    let response = response.select(&args.selection());
    let formatter = FormatterFactory::create(
        args.format,
        FormatterOptions {
            color: settings.color,
            details: args.info,
        },
    );
    let output = formatter.format(&response)?;

    let presenter = PresenterFactory::create(PresenterType::from(args.output.clone()));
    presenter.present(&output)?;

    if args.debug {
        for diagnostic in &response.diagnostics {
            eprintln!("[debug] {}", diagnostic);
        }
    }

    Ok(())
}

fn load_config(args: &Args) -> Result<ConfigFile> {
    if let Some(path) = &args.config {
        return config::load_config_from_path(path);
    }
    match config::default_config_dir() {
        Some(dir) => Ok(config::discover_config(&dir)?.unwrap_or_default()),
        None => Ok(ConfigFile::default()),
    }
}

/// Explicit directories replace interpreter discovery.
async fn resolve_roots(args: &Args, settings: &Settings) -> Vec<InstallRoot> {
    if !args.directories.is_empty() {
        return args
            .directories
            .iter()
            .map(|dir| InstallRoot::with_derived_bucket(dir.clone(), args.scope.into()))
            .collect();
    }

    let locator = PythonSiteLocator::new();
    let mut roots: Vec<InstallRoot> = Vec::new();
    for interpreter in &settings.interpreters {
        match locator.locate(interpreter).await {
            Ok(found) => {
                for root in found {
                    if !roots.iter().any(|known| known.path() == root.path()) {
                        roots.push(root);
                    }
                }
            }
            Err(e) => tracing::warn!("{}", e),
        }
    }
    roots
}

fn pypi_client(args: &Args) -> Result<PyPiClient> {
    match &args.index_url {
        Some(url) => PyPiClient::with_base_url(url.clone()),
        None => PyPiClient::new(),
    }
}

fn build_remote_facts(
    args: &Args,
    settings: &Settings,
) -> Result<CachedRemoteFacts<FileCacheStore, SystemClock>> {
    let vulnerability_source: Box<dyn VulnerabilitySource> = match settings.vulnerability_source {
        VulnerabilitySourceKind::Pypi => Box::new(pypi_client(args)?),
        VulnerabilitySourceKind::Osv => Box::new(match &args.osv_url {
            Some(url) => OsvClient::with_base_url(url.clone())?,
            None => OsvClient::new()?,
        }),
    };

    let cache = LookupCache::new(
        FileCacheStore::new(settings.cache_dir.clone()),
        SystemClock,
        settings.cache_ttl_hours,
    );
    Ok(CachedRemoteFacts::new(
        cache,
        Box::new(pypi_client(args)?),
        vulnerability_source,
    ))
}

async fn take_inventory<P, F>(
    progress_reporter: P,
    remote_facts: F,
    request: InventoryRequest,
) -> Result<InventoryResponse>
where
    P: ProgressReporter,
    F: RemoteFacts,
{
    let use_case = TakeInventoryUseCase::new(FileSystemReader::new(), remote_facts, progress_reporter);
    use_case.execute(request).await
}

/// Lookup failures are summarized; other warnings are printed one by one.
fn report_warnings(response: &InventoryResponse) {
    let mut failed_lookups = 0;
    for warning in response.warnings() {
        match warning {
            Diagnostic::Lookup { .. } => failed_lookups += 1,
            other => eprintln!("⚠️  Warning: {}", other),
        }
    }
    if failed_lookups > 0 {
        eprintln!(
            "⚠️  Warning: {} remote lookup(s) failed; the affected facets are shown as unknown",
            failed_lookups
        );
    }
}
