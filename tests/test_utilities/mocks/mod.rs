/// Mock implementations for testing
mod mock_progress_reporter;
mod mock_remote_facts;

pub use mock_progress_reporter::MockProgressReporter;
pub use mock_remote_facts::MockRemoteFacts;
