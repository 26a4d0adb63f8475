mod classified_package;
mod diagnostic;
mod install_root;
mod inventory_summary;
mod lookup;
mod package_name;
mod package_record;
mod requirement;
mod requirement_index;
mod version;
mod vulnerability;

pub use classified_package::ClassifiedPackage;
pub use diagnostic::Diagnostic;
pub use install_root::{InstallRoot, MetadataLocation, MetadataShape};
pub use inventory_summary::InventorySummary;
pub use lookup::{Fact, LookupStatus, QueryKind};
pub use package_name::PackageName;
pub use package_record::{PackageRecord, RuntimeBucket, Scope};
pub use requirement::{Requirement, VersionConstraint};
pub use requirement_index::RequirementIndex;
pub use version::Version;
pub use vulnerability::Vulnerability;
