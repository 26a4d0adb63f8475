/// Data Transfer Objects for application layer
///
/// DTOs are used to transfer data between the application layer
/// and adapters, keeping the domain layer isolated.
mod inventory_request;
mod inventory_response;
mod output_format;
mod package_selection;

pub use inventory_request::{InventoryRequest, DEFAULT_MAX_CONCURRENT_LOOKUPS};
pub use inventory_response::InventoryResponse;
pub use output_format::OutputFormat;
pub use package_selection::PackageSelection;
