use super::fingerprint::{fingerprint, Fingerprint};
use crate::errors::AppResult;
use crate::models::Record;
use crate::utils::round_two_decimals;
use std::collections::HashMap;
use tracing::info;

/// Record counts on either side of a deduplication pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DedupeStats {
    pub before: usize,
    pub after: usize,
}

impl DedupeStats {
    /// Share of records kept, as a percentage. An empty input keeps everything.
    pub fn ratio_percent(&self) -> f64 {
        if self.before == 0 {
            return 100.0;
        }
        self.after as f64 / self.before as f64 * 100.0
    }

    pub fn removed(&self) -> usize {
        self.before - self.after
    }
}

/// Collapses content-equal records so that each fingerprint appears once.
///
/// When several records share a fingerprint the last one in input order is kept, in
/// the position where that fingerprint first appeared. Since equal fingerprints mean
/// equal content the choice only matters for reproducibility.
///
/// # Errors
///
/// Fails if a record cannot be encoded for hashing; no record is dropped silently.
pub fn deduplicate(records: Vec<Record>) -> AppResult<(Vec<Record>, DedupeStats)> {
    let before = records.len();
    info!(records = before, "Records before deduplication");

    let mut slots: HashMap<Fingerprint, usize> = HashMap::with_capacity(before);
    let mut unique: Vec<Record> = Vec::with_capacity(before);

    for record in records {
        let key = fingerprint(&record)?;
        match slots.get(&key) {
            Some(&slot) => unique[slot] = record,
            None => {
                slots.insert(key, unique.len());
                unique.push(record);
            }
        }
    }

    let stats = DedupeStats {
        before,
        after: unique.len(),
    };
    info!(
        records = stats.after,
        removed = stats.removed(),
        kept_percent = round_two_decimals(stats.ratio_percent()),
        "Records after deduplication"
    );

    Ok((unique, stats))
}
