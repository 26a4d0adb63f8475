/// Type alias for Result with anyhow::Error as the default error type.
/// This provides a consistent error handling pattern across the codebase,
/// while ports with typed errors can still name them: `Result<T, LookupError>`.
pub type Result<T, E = anyhow::Error> = std::result::Result<T, E>;
