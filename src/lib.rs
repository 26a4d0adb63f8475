//! pipinfo - Inventory of installed Python packages
//!
//! This library scans site-packages directories, parses the package metadata
//! found there and classifies every installation: duplicate or not, required
//! by another package or not, and (with the remote checks enabled) outdated
//! and vulnerable or not. Remote answers are cached on disk for 24 hours.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`inventory`): Value objects and pure services
//! - **Application Layer** (`application`): The inventory use case and its DTOs
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use pipinfo::prelude::*;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<()> {
//! let cache = LookupCache::new(
//!     FileCacheStore::new(PathBuf::from("/tmp/pipinfo-cache")),
//!     SystemClock,
//!     DEFAULT_TTL_HOURS,
//! );
//! let remote_facts = CachedRemoteFacts::new(
//!     cache,
//!     Box::new(PyPiClient::new()?),
//!     Box::new(PyPiClient::new()?),
//! );
//! let use_case = TakeInventoryUseCase::new(
//!     FileSystemReader::new(),
//!     remote_facts,
//!     StderrProgressReporter::new(),
//! );
//!
//! let root = InstallRoot::with_derived_bucket(
//!     PathBuf::from("/usr/lib/python3.12/site-packages"),
//!     Scope::System,
//! );
//! let request = InventoryRequest::new(vec![root]).with_latest_check(true);
//! let response = use_case.execute(request).await?;
//!
//! let output = TableFormatter::new(false, false).format(&response)?;
//! println!("{}", output);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod cli;
pub mod config;
pub mod inventory;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::cache::{
        CachedRemoteFacts, LookupCache, SystemClock, DEFAULT_TTL_HOURS,
    };
    pub use crate::adapters::outbound::console::{SilentProgressReporter, StderrProgressReporter};
    pub use crate::adapters::outbound::filesystem::{
        FileCacheStore, FileSystemReader, FileSystemWriter, StdoutPresenter,
    };
    pub use crate::adapters::outbound::formatters::{JsonFormatter, TableFormatter};
    pub use crate::adapters::outbound::network::{OsvClient, PyPiClient};
    pub use crate::adapters::outbound::python::PythonSiteLocator;
    pub use crate::application::dto::{
        InventoryRequest, InventoryResponse, OutputFormat, PackageSelection,
    };
    pub use crate::application::use_cases::TakeInventoryUseCase;
    pub use crate::inventory::domain::{
        ClassifiedPackage, Diagnostic, Fact, InstallRoot, InventorySummary, LookupStatus,
        PackageName, PackageRecord, QueryKind, RuntimeBucket, Scope, Version, Vulnerability,
    };
    pub use crate::ports::outbound::{
        CacheStore, Clock, LatestVersionSource, Lookup, LookupOrigin, MetadataReader,
        OutputPresenter, ProgressReporter, RemoteFacts, ReportFormatter, SiteLocator,
        VulnerabilitySource,
    };
    pub use crate::shared::Result;
}
