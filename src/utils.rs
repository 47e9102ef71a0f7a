use crate::errors::{AppError, AppResult};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;
use tempfile::NamedTempFile;

pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

pub fn mb_from_bytes(bytes: u64) -> f64 {
    bytes as f64 / 1_048_576.0
}

pub fn round_two_decimals(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Writes `path` through a temporary file in the same directory and renames it into
/// place only once `write` succeeds, so a failed run never leaves a truncated file.
///
/// Missing parent directories are created. Returns the size of the written file.
pub fn write_atomically<F>(path: &Path, write: F) -> AppResult<u64>
where
    F: FnOnce(&mut dyn Write) -> AppResult<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| {
        AppError::IoError(format!("Failed to create directory {}: {e}", dir.display()))
    })?;

    let tmp = NamedTempFile::new_in(dir).map_err(|e| {
        AppError::IoError(format!(
            "Failed to create temporary file in {}: {e}",
            dir.display()
        ))
    })?;

    {
        let mut writer = BufWriter::new(tmp.as_file());
        write(&mut writer)?;
        writer
            .flush()
            .map_err(|e| AppError::IoError(format!("Failed to write {}: {e}", path.display())))?;
    }

    let file = tmp
        .persist(path)
        .map_err(|e| AppError::IoError(format!("Failed to write {}: {}", path.display(), e.error)))?;
    let size = file
        .metadata()
        .map_err(|e| {
            AppError::IoError(format!(
                "Failed to read file metadata {}: {e}",
                path.display()
            ))
        })?
        .len();
    Ok(size)
}
