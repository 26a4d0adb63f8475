/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the inventory core uses
/// to interact with external systems (file system, network, interpreters, console).
pub mod cache_store;
pub mod clock;
pub mod metadata_reader;
pub mod output_presenter;
pub mod package_index;
pub mod progress_reporter;
pub mod remote_facts;
pub mod report_formatter;
pub mod site_locator;

pub use cache_store::{CacheEntry, CacheKey, CachePayload, CacheStore};
pub use clock::Clock;
pub use metadata_reader::{MetadataReader, RawMetadata};
pub use output_presenter::OutputPresenter;
pub use package_index::{LatestVersionSource, VulnerabilitySource};
pub use progress_reporter::ProgressReporter;
pub use remote_facts::{Lookup, LookupOrigin, RemoteFacts};
pub use report_formatter::ReportFormatter;
pub use site_locator::SiteLocator;
