use super::dedupe::deduplicate;
use super::timestamp::{resolve_timestamps, DateParser};
use crate::config::ResolvedConfig;
use crate::errors::AppResult;
use crate::models::{Record, TimedRecord};
use crate::snapshot::write_snapshot;
use crate::utils::{format_duration, mb_from_bytes, round_two_decimals, write_atomically};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Settings for the merge stage.
#[derive(Debug, Clone)]
pub struct MergeOptions {
    pub dedupe: bool,
    /// Persist the deduplicated set here before timestamps are attached.
    pub dedupe_snapshot_path: Option<PathBuf>,
    pub date_field: String,
}

impl From<&ResolvedConfig> for MergeOptions {
    fn from(config: &ResolvedConfig) -> Self {
        Self {
            dedupe: config.dedupe,
            dedupe_snapshot_path: config.dedupe_snapshot_path.clone(),
            date_field: config.date_field.clone(),
        }
    }
}

/// Orders records by `(ts, tag)`.
///
/// The sort is stable: records with equal instant and tag keep their incoming
/// order, which is the file-list order from the parse stage.
pub fn sort_records(records: &mut [TimedRecord]) {
    records.sort_by(|a, b| {
        a.ts.total_cmp(&b.ts)
            .then_with(|| a.record.tag.cmp(&b.record.tag))
    });
}

/// Runs the in-memory stages: optional dedupe, timestamp resolution, sort.
///
/// # Errors
///
/// Fails if the deduplicated snapshot cannot be written or any record's date cannot
/// be resolved. Nothing is returned for partial input in either case.
pub fn merge_records(
    records: Vec<Record>,
    options: &MergeOptions,
    parser: &dyn DateParser,
) -> AppResult<Vec<TimedRecord>> {
    let records = if options.dedupe {
        let (unique, _) = deduplicate(records)?;
        if let Some(path) = &options.dedupe_snapshot_path {
            info!(path = %path.display(), "Writing deduplicated snapshot");
            write_snapshot(path, &unique)?;
        }
        unique
    } else {
        records
    };

    let mut timed = resolve_timestamps(records, parser, &options.date_field)?;

    info!(records = timed.len(), "Sorting records");
    sort_records(&mut timed);
    Ok(timed)
}

/// Writes the sorted dataset as an indented JSON array, atomically.
pub fn write_json(path: &Path, records: &[TimedRecord]) -> AppResult<()> {
    let start = Instant::now();
    let size = write_atomically(path, |writer| {
        serde_json::to_writer_pretty(&mut *writer, records)?;
        writer.write_all(b"\n")?;
        Ok(())
    })?;

    info!(
        path = %path.display(),
        records = records.len(),
        size_mb = round_two_decimals(mb_from_bytes(size)),
        elapsed = format_duration(start.elapsed()),
        "JSON written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use proptest::collection::vec;
    use proptest::prelude::*;
    use std::fs;
    use tempfile::TempDir;

    struct SecondsParser;

    impl DateParser for SecondsParser {
        fn parse(&self, input: &str) -> Option<f64> {
            input.parse().ok()
        }
    }

    fn record(tag: &str, date: &str, id: &str) -> Record {
        Record::new(tag)
            .with_attribute("readable_date", date)
            .with_attribute("id", id)
    }

    fn options(dedupe: bool) -> MergeOptions {
        MergeOptions {
            dedupe,
            dedupe_snapshot_path: None,
            date_field: "readable_date".to_string(),
        }
    }

    fn ids(records: &[TimedRecord]) -> Vec<&str> {
        records
            .iter()
            .filter_map(|t| t.record.attribute("id"))
            .collect()
    }

    #[test]
    fn test_sorts_by_time_then_tag() {
        let records = vec![
            record("sms", "20", "a"),
            record("sms", "10", "b"),
            record("call", "20", "c"),
            record("call", "10", "d"),
        ];
        let merged = merge_records(records, &options(false), &SecondsParser).unwrap();
        assert_eq!(ids(&merged), vec!["d", "b", "c", "a"]);
    }

    #[test]
    fn test_equal_keys_keep_input_order() {
        let records = vec![
            record("sms", "5", "first"),
            record("call", "9", "other"),
            record("sms", "5", "second"),
            record("sms", "5", "third"),
        ];
        let merged = merge_records(records, &options(false), &SecondsParser).unwrap();
        assert_eq!(ids(&merged), vec!["first", "second", "third", "other"]);
    }

    #[test]
    fn test_fractional_seconds_order_correctly() {
        let records = vec![record("sms", "1.75", "late"), record("sms", "1.25", "early")];
        let merged = merge_records(records, &options(false), &SecondsParser).unwrap();
        assert_eq!(ids(&merged), vec!["early", "late"]);
    }

    #[test]
    fn test_dedupe_is_optional() {
        let records = vec![record("sms", "1", "x"), record("sms", "1", "x")];

        let kept = merge_records(records.clone(), &options(false), &SecondsParser).unwrap();
        assert_eq!(kept.len(), 2);

        let collapsed = merge_records(records, &options(true), &SecondsParser).unwrap();
        assert_eq!(collapsed.len(), 1);
    }

    #[test]
    fn test_dedupe_snapshot_is_written_when_requested() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dedup.snapshot");
        let opts = MergeOptions {
            dedupe_snapshot_path: Some(path.clone()),
            ..options(true)
        };

        let records = vec![record("sms", "1", "x"), record("sms", "1", "x")];
        merge_records(records, &opts, &SecondsParser).unwrap();

        let restored = crate::snapshot::read_snapshot(&path).unwrap();
        assert_eq!(restored, vec![record("sms", "1", "x")]);
    }

    #[test]
    fn test_unresolvable_date_aborts_merge() {
        let records = vec![record("sms", "1", "ok"), record("sms", "whenever", "bad")];
        let err = merge_records(records, &options(false), &SecondsParser).unwrap_err();
        assert!(matches!(err, AppError::UnparseableDate { index: 1, .. }));
    }

    #[test]
    fn test_write_json_emits_indented_array() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.json");
        let timed = vec![TimedRecord {
            record: Record::new("sms")
                .with_attribute("body", "hi")
                .with_child(Record::new("part")),
            ts: 12.5,
        }];

        write_json(&path, &timed).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n  {\n"));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["tag"], "sms");
        assert_eq!(value[0]["attributes"]["body"], "hi");
        assert_eq!(value[0]["children"][0]["tag"], "part");
        assert!(value[0]["children"][0].get("_ts").is_none());
        assert_eq!(value[0]["_ts"], 12.5);
    }

    proptest! {
        #[test]
        fn test_output_is_ordered_and_stable(
            entries in vec((0u8..5, prop::sample::select(vec!["call", "mms", "sms"])), 0..30),
        ) {
            let records: Vec<Record> = entries
                .iter()
                .enumerate()
                .map(|(i, (ts, tag))| record(tag, &ts.to_string(), &i.to_string()))
                .collect();

            let merged = merge_records(records, &options(false), &SecondsParser).unwrap();

            for pair in merged.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                prop_assert!(a.ts <= b.ts);
                if a.ts == b.ts {
                    prop_assert!(a.record.tag <= b.record.tag);
                    if a.record.tag == b.record.tag {
                        let ia: usize = a.record.attribute("id").unwrap().parse().unwrap();
                        let ib: usize = b.record.attribute("id").unwrap().parse().unwrap();
                        prop_assert!(ia < ib);
                    }
                }
            }
        }
    }
}
