mod dedupe;
mod fingerprint;
mod pipeline;
pub mod timestamp;

// Re-export public API
pub use dedupe::{deduplicate, DedupeStats};
pub use fingerprint::{canonical_json, fingerprint, Fingerprint};
pub use pipeline::{merge_records, sort_records, write_json, MergeOptions};
pub use timestamp::{resolve_timestamps, DateParser, FormatDateParser, ZoneChoice};
