/// Adapters layer - Infrastructure implementations
///
/// This layer contains concrete implementations of the outbound ports,
/// providing the actual integration with the file system, the network,
/// Python interpreters and the terminal.
pub mod outbound;
