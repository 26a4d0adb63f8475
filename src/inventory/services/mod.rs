mod classifier;
mod metadata_parser;
mod metadata_shape;
mod record_deduplicator;

pub use classifier::Classifier;
pub use metadata_parser::MetadataParser;
pub use metadata_shape::MetadataShapeDetector;
pub use record_deduplicator::{ParsedRecord, RecordDeduplicator};
