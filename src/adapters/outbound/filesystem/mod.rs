/// Filesystem adapters: metadata reading, the lookup cache's entry store, report output
mod file_cache_store;
mod file_reader;
mod file_writer;

pub use file_cache_store::FileCacheStore;
pub use file_reader::FileSystemReader;
pub use file_writer::{FileSystemWriter, StdoutPresenter};
