use crate::inventory::domain::{Diagnostic, MetadataShape, PackageRecord};
use std::collections::HashMap;
use std::path::PathBuf;

/// A parsed record together with the scan facts the deduplicator needs.
#[derive(Debug, Clone)]
pub struct ParsedRecord {
    pub record: PackageRecord,
    pub shape: MetadataShape,
    pub root: PathBuf,
}

/// Collapses records that describe the same release twice inside one root.
///
/// Installers sometimes leave both a `.dist-info` and an `.egg-info` record for one
/// release. Those are one installation, not a shadowing duplicate. Records in different
/// roots, or with different versions, are always kept.
pub struct RecordDeduplicator;

impl RecordDeduplicator {
    /// Returns the surviving records in input order, plus one diagnostic per suppressed record.
    pub fn deduplicate(parsed: Vec<ParsedRecord>) -> (Vec<PackageRecord>, Vec<Diagnostic>) {
        // (root, normalized name, version text) -> index of the record kept so far
        let mut kept_at: HashMap<(PathBuf, String, String), usize> = HashMap::new();
        let mut slots: Vec<Option<ParsedRecord>> = Vec::with_capacity(parsed.len());
        let mut diagnostics = Vec::new();

        for candidate in parsed {
            let key = (
                candidate.root.clone(),
                candidate.record.name().normalized().to_string(),
                candidate.record.version().to_string(),
            );

            let existing = kept_at.get(&key).copied();
            let Some(index) = existing else {
                kept_at.insert(key, slots.len());
                slots.push(Some(candidate));
                continue;
            };

            let Some(current) = slots[index].take() else {
                continue;
            };
            let (winner, loser) = if candidate.shape.precedence() < current.shape.precedence() {
                (candidate, current)
            } else {
                (current, candidate)
            };
            diagnostics.push(Diagnostic::DuplicateRecordSuppressed {
                kept: winner.record.location().to_path_buf(),
                suppressed: loser.record.location().to_path_buf(),
            });
            slots[index] = Some(winner);
        }

        let records = slots.into_iter().flatten().map(|p| p.record).collect();
        (records, diagnostics)
    }
}
