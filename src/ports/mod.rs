/// Ports module defining interfaces for hexagonal architecture
///
/// The inventory is driven directly by the CLI through its use case, so only
/// outbound ports (infrastructure interfaces) are defined.
pub mod outbound;
