use crate::application::dto::{InventoryRequest, InventoryResponse};
use crate::inventory::domain::{
    ClassifiedPackage, Diagnostic, Fact, MetadataLocation, PackageName, PackageRecord, QueryKind,
    RequirementIndex, Version, Vulnerability,
};
use crate::inventory::services::{Classifier, MetadataParser, ParsedRecord, RecordDeduplicator};
use crate::ports::outbound::{
    Lookup, LookupOrigin, MetadataReader, ProgressReporter, RemoteFacts,
};
use crate::shared::error::{LookupError, ParseError, PipinfoError};
use crate::shared::Result;
use futures::stream::{self, StreamExt};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Parsing workers when the available parallelism cannot be queried
const FALLBACK_PARSE_WORKERS: usize = 4;

/// One remote question, asked once per distinct name (or name and version).
enum LookupJob<'a> {
    Latest(&'a PackageName),
    Vulnerabilities(&'a PackageName, &'a Version),
}

impl LookupJob<'_> {
    fn package(&self) -> &PackageName {
        match self {
            LookupJob::Latest(name) | LookupJob::Vulnerabilities(name, _) => name,
        }
    }
}

/// A job's result, carrying the question it answers.
enum LookupAnswer<'a> {
    Latest(&'a PackageName, Result<Lookup<Version>, LookupError>),
    Vulnerabilities(
        &'a PackageName,
        &'a Version,
        Result<Lookup<Vec<Vulnerability>>, LookupError>,
    ),
}

/// Remote facts gathered for the whole inventory, keyed the way the cache keys them.
#[derive(Default)]
struct RemoteAnswers {
    latest: BTreeMap<String, Fact<Version>>,
    vulnerabilities: BTreeMap<(String, String), Fact<Vec<Vulnerability>>>,
}

/// TakeInventoryUseCase - Core use case of pipinfo
///
/// Scans installation roots, parses every metadata record, builds the
/// requirement index, asks the remote facts port the enabled questions and
/// classifies each record. Nothing short of zero usable roots fails the run;
/// every other problem becomes a [`Diagnostic`] in the response.
///
/// # Type Parameters
/// * `R` - MetadataReader implementation
/// * `F` - RemoteFacts implementation
/// * `P` - ProgressReporter implementation
pub struct TakeInventoryUseCase<R, F, P> {
    metadata_reader: Arc<R>,
    remote_facts: F,
    progress_reporter: P,
}

impl<R, F, P> TakeInventoryUseCase<R, F, P>
where
    R: MetadataReader + 'static,
    F: RemoteFacts,
    P: ProgressReporter,
{
    /// Creates a new TakeInventoryUseCase with injected dependencies
    pub fn new(metadata_reader: R, remote_facts: F, progress_reporter: P) -> Self {
        Self {
            metadata_reader: Arc::new(metadata_reader),
            remote_facts,
            progress_reporter,
        }
    }

    /// Executes the inventory
    ///
    /// # Errors
    /// Returns `PipinfoError::NoUsableRoots` when none of the requested roots exists
    /// and can be enumerated.
    pub async fn execute(&self, request: InventoryRequest) -> Result<InventoryResponse> {
        let mut diagnostics = Vec::new();

        // Step 1: Enumerate metadata records
        let locations = self.scan_roots(&request, &mut diagnostics)?;

        // Step 2: Parse records on the blocking pool
        let parsed = self.parse_records(locations, &mut diagnostics).await;

        // Step 3: Drop records that describe one installation twice
        let (records, suppressed) = RecordDeduplicator::deduplicate(parsed);
        diagnostics.extend(suppressed);
        self.progress_reporter
            .report(&format!("✅ Found {} package(s)", records.len()));

        // Step 4: Requirement index over the complete record set
        let index = RequirementIndex::build(&records);
        tracing::debug!("{} package name(s) are required by another package", index.len());

        // Step 5: Remote facts, when requested
        let answers = self
            .lookup_remote_facts(&request, &records, &mut diagnostics)
            .await;
        diagnostics.extend(self.remote_facts.drain_diagnostics());

        // Step 6: Classify, then sort once everything is known
        let packages = Self::classify(records, &index, &request, &answers);

        Ok(InventoryResponse::new(packages, diagnostics))
    }

    fn scan_roots(
        &self,
        request: &InventoryRequest,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Vec<MetadataLocation>> {
        self.progress_reporter.report(&format!(
            "🔍 Scanning {} installation root(s)...",
            request.roots.len()
        ));

        let mut usable = 0;
        let mut locations = Vec::new();
        for root in &request.roots {
            match self.metadata_reader.scan_root(root) {
                Ok(Some(found)) => {
                    tracing::debug!(
                        "{} ({}, {}): {} record(s)",
                        root.path().display(),
                        root.scope(),
                        root.runtime_bucket(),
                        found.len()
                    );
                    usable += 1;
                    locations.extend(found);
                }
                Ok(None) => {
                    tracing::debug!("{} does not exist, skipped", root.path().display());
                }
                Err(e) => {
                    tracing::warn!("{}", e);
                    diagnostics.push(e.into());
                }
            }
        }

        if usable == 0 {
            return Err(PipinfoError::NoUsableRoots {
                attempted: request.roots.len(),
            }
            .into());
        }
        Ok(locations)
    }

    /// Parses every location, keeping discovery order regardless of completion order.
    async fn parse_records(
        &self,
        locations: Vec<MetadataLocation>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<ParsedRecord> {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(FALLBACK_PARSE_WORKERS);

        let mut results: Vec<(usize, std::result::Result<ParsedRecord, ParseError>)> =
            stream::iter(locations.into_iter().enumerate())
                .map(|(position, location)| {
                    let reader = Arc::clone(&self.metadata_reader);
                    async move {
                        let path = location.path.clone();
                        let result =
                            tokio::task::spawn_blocking(move || read_and_parse(&*reader, &location))
                                .await
                                .unwrap_or_else(|e| {
                                    Err(ParseError::Unreadable {
                                        location: path,
                                        details: e.to_string(),
                                    })
                                });
                        (position, result)
                    }
                })
                .buffer_unordered(workers)
                .collect()
                .await;
        results.sort_by_key(|(position, _)| *position);

        let mut parsed = Vec::with_capacity(results.len());
        for (_, result) in results {
            match result {
                Ok(record) => parsed.push(record),
                Err(e) => {
                    tracing::warn!("{}", e);
                    diagnostics.push(e.into());
                }
            }
        }
        parsed
    }

    async fn lookup_remote_facts(
        &self,
        request: &InventoryRequest,
        records: &[PackageRecord],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> RemoteAnswers {
        if !request.needs_remote_facts() {
            return RemoteAnswers::default();
        }

        let jobs = Self::plan_lookups(request, records);
        let total = jobs.len();
        self.progress_reporter.report(&format!(
            "🌐 Running {} remote lookup(s) (up to {} at a time)...",
            total, request.max_concurrent_lookups
        ));

        let remote_facts = &self.remote_facts;
        let mut completions = stream::iter(jobs.iter().enumerate())
            .map(|(position, job)| async move {
                let answer = match *job {
                    LookupJob::Latest(name) => {
                        LookupAnswer::Latest(name, remote_facts.latest_version(name).await)
                    }
                    LookupJob::Vulnerabilities(name, version) => LookupAnswer::Vulnerabilities(
                        name,
                        version,
                        remote_facts.vulnerabilities(name, version).await,
                    ),
                };
                (position, answer)
            })
            .buffer_unordered(request.max_concurrent_lookups.max(1));

        let mut slots: Vec<Option<LookupAnswer>> = (0..total).map(|_| None).collect();
        let mut done = 0;
        while let Some((position, answer)) = completions.next().await {
            done += 1;
            self.progress_reporter.report_progress(
                done,
                total,
                Some(jobs[position].package().as_str()),
            );
            slots[position] = Some(answer);
        }
        self.progress_reporter
            .report_completion(&format!("✅ Completed {} remote lookup(s)", total));

        let mut answers = RemoteAnswers::default();
        for answer in slots.into_iter().flatten() {
            match answer {
                LookupAnswer::Latest(package, result) => {
                    let fact = Self::into_fact(
                        package,
                        QueryKind::LatestVersion,
                        result,
                        diagnostics,
                    );
                    answers.latest.insert(package.normalized().to_string(), fact);
                }
                LookupAnswer::Vulnerabilities(package, version, result) => {
                    let fact = Self::into_fact(
                        package,
                        QueryKind::Vulnerabilities,
                        result,
                        diagnostics,
                    );
                    answers.vulnerabilities.insert(
                        (package.normalized().to_string(), version.to_string()),
                        fact,
                    );
                }
            }
        }
        answers
    }

    /// One latest-version job per distinct name, one vulnerability job per
    /// distinct (name, version), in name order.
    fn plan_lookups<'a>(
        request: &InventoryRequest,
        records: &'a [PackageRecord],
    ) -> Vec<LookupJob<'a>> {
        let mut latest: BTreeMap<&str, &PackageName> = BTreeMap::new();
        let mut vulnerabilities: BTreeMap<(&str, &str), (&PackageName, &Version)> =
            BTreeMap::new();

        for record in records {
            let name = record.name();
            if request.check_latest {
                latest.entry(name.normalized()).or_insert(name);
            }
            if request.check_vulnerabilities {
                vulnerabilities
                    .entry((name.normalized(), record.version().as_str()))
                    .or_insert((name, record.version()));
            }
        }

        latest
            .into_values()
            .map(LookupJob::Latest)
            .chain(
                vulnerabilities
                    .into_values()
                    .map(|(name, version)| LookupJob::Vulnerabilities(name, version)),
            )
            .collect()
    }

    fn into_fact<T>(
        package: &PackageName,
        kind: QueryKind,
        result: std::result::Result<Lookup<T>, LookupError>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Fact<T> {
        match result {
            Ok(Lookup {
                value,
                origin: LookupOrigin::StaleFallback { fetched_at, error },
            }) => {
                tracing::debug!("{} for {}: degraded answer ({})", kind, package, error);
                diagnostics.push(Diagnostic::Degraded {
                    package: package.as_str().to_string(),
                    kind,
                    fetched_at,
                    error,
                });
                Fact::degraded(value)
            }
            Ok(lookup) => Fact::fresh(lookup.value),
            Err(error) => {
                tracing::debug!("{} for {}: {}", kind, package, error);
                diagnostics.push(Diagnostic::Lookup {
                    package: package.as_str().to_string(),
                    kind,
                    error,
                });
                Fact::failed()
            }
        }
    }

    fn classify(
        records: Vec<PackageRecord>,
        index: &RequirementIndex,
        request: &InventoryRequest,
        answers: &RemoteAnswers,
    ) -> Vec<ClassifiedPackage> {
        let classifier = Classifier::new(&records, index);

        let mut packages: Vec<ClassifiedPackage> = records
            .into_iter()
            .map(|record| {
                let latest = if request.check_latest {
                    answers
                        .latest
                        .get(record.name().normalized())
                        .cloned()
                        .unwrap_or_else(Fact::failed)
                } else {
                    Fact::not_requested()
                };
                let vulnerabilities = if request.check_vulnerabilities {
                    answers
                        .vulnerabilities
                        .get(&(
                            record.name().normalized().to_string(),
                            record.version().to_string(),
                        ))
                        .cloned()
                        .unwrap_or_else(Fact::failed)
                } else {
                    Fact::not_requested()
                };
                classifier.classify(record, latest, vulnerabilities)
            })
            .collect();

        Classifier::sort(&mut packages);
        packages
    }
}

fn read_and_parse<R: MetadataReader + ?Sized>(
    reader: &R,
    location: &MetadataLocation,
) -> std::result::Result<ParsedRecord, ParseError> {
    let raw = reader.read_record(location)?;
    let record = MetadataParser::parse(location, &raw.header_text, raw.requires_txt.as_deref())?;
    Ok(ParsedRecord {
        record,
        shape: location.shape,
        root: location.root.clone(),
    })
}
