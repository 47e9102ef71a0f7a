use super::decompress::open_backup;
use super::file_finder::find_backup_files;
use super::xml_parser::parse_records;
use crate::errors::{AppError, AppResult};
use crate::models::Record;
use crate::ui::create_progress_bar;
use crate::utils::format_duration;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Result of the parse stage.
#[derive(Debug, Default)]
pub struct ParseOutcome {
    /// Records from every readable file, concatenated in file-list order.
    pub records: Vec<Record>,
    pub files_parsed: usize,
    /// Files skipped because they could not be opened, decompressed or parsed.
    pub files_failed: Vec<(PathBuf, AppError)>,
}

/// Opens, decompresses and flattens a single export file.
pub fn parse_file(path: &Path) -> AppResult<Vec<Record>> {
    let reader = open_backup(path)?;
    parse_records(reader).map_err(|e| match e {
        AppError::ParseError(msg) => {
            AppError::ParseError(format!("{}: {msg}", path.display()))
        }
        other => other,
    })
}

/// Parses `paths` on a dedicated pool of `workers` threads.
///
/// Each worker owns a file from open to flattened records; nothing is shared
/// between workers except the progress bar. Results are gathered by position in
/// `paths`, so the concatenated order does not depend on scheduling. A file that
/// fails is logged and contributes no records; the run continues.
pub fn parse_files(paths: &[PathBuf], workers: usize) -> AppResult<ParseOutcome> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .thread_name(|i| format!("parser-{i}"))
        .build()
        .map_err(|e| AppError::InvalidInput(format!("Failed to build parser pool: {e}")))?;

    let pb = create_progress_bar(paths.len() as u64, "parsing")?;

    let results: Vec<AppResult<Vec<Record>>> = pool.install(|| {
        paths
            .par_iter()
            .map(|path| {
                debug!(path = %path.display(), "Parsing file");
                let result = parse_file(path);
                pb.inc(1);
                result
            })
            .collect()
    });
    pb.finish_with_message(format!("Parsed {} file(s)", paths.len()));

    let mut outcome = ParseOutcome::default();
    for (path, result) in paths.iter().zip(results) {
        match result {
            Ok(mut records) => {
                debug!(path = %path.display(), records = records.len(), "File parsed");
                outcome.files_parsed += 1;
                outcome.records.append(&mut records);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Unable to read file, skipping");
                outcome.files_failed.push((path.clone(), e));
            }
        }
    }

    Ok(outcome)
}

/// Discovers every export under `dir` and parses them all.
pub fn parse_directory(dir: &Path, workers: usize) -> AppResult<ParseOutcome> {
    let start = Instant::now();
    let files = find_backup_files(dir)?;
    if files.is_empty() {
        warn!(dir = %dir.display(), "No call or SMS exports found");
    }
    info!(
        dir = %dir.display(),
        files = files.len(),
        workers = workers,
        "Starting XML parsing"
    );

    let outcome = parse_files(&files, workers)?;

    info!(
        files_parsed = outcome.files_parsed,
        files_failed = outcome.files_failed.len(),
        records = outcome.records.len(),
        elapsed = format_duration(start.elapsed()),
        "Parsing completed"
    );
    Ok(outcome)
}
