//! Intermediate snapshot of a record list.
//!
//! Layout: the 8-byte magic `SMSMERGE`, a little-endian `u16` format version, then
//! the bincode encoding of `Vec<Record>`. It lets the merge stage rerun without
//! parsing every XML export again.

use crate::constants::{SNAPSHOT_MAGIC, SNAPSHOT_VERSION};
use crate::errors::{AppError, AppResult};
use crate::models::Record;
use crate::utils::{mb_from_bytes, round_two_decimals, write_atomically};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;

/// Writes `records` to `path` atomically.
pub fn write_snapshot(path: &Path, records: &[Record]) -> AppResult<()> {
    let size = write_atomically(path, |writer| {
        writer.write_all(SNAPSHOT_MAGIC)?;
        writer.write_all(&SNAPSHOT_VERSION.to_le_bytes())?;
        bincode::serialize_into(writer, records).map_err(|e| {
            AppError::SnapshotError(format!("Failed to encode {}: {e}", path.display()))
        })
    })?;

    info!(
        path = %path.display(),
        records = records.len(),
        size_mb = round_two_decimals(mb_from_bytes(size)),
        "Snapshot written"
    );
    Ok(())
}

/// Reads a snapshot written by [`write_snapshot`].
///
/// # Errors
///
/// Returns `IoError` if the file cannot be opened and `SnapshotError` if the header
/// does not match or the payload does not decode.
pub fn read_snapshot(path: &Path) -> AppResult<Vec<Record>> {
    let file = File::open(path).map_err(|e| {
        AppError::IoError(format!("Failed to open snapshot {}: {e}", path.display()))
    })?;
    let mut reader = BufReader::new(file);

    let mut magic = [0u8; 8];
    if reader.read_exact(&mut magic).is_err() || &magic != SNAPSHOT_MAGIC {
        return Err(AppError::SnapshotError(format!(
            "{} is not a record snapshot",
            path.display()
        )));
    }

    let mut version = [0u8; 2];
    reader.read_exact(&mut version).map_err(|e| {
        AppError::SnapshotError(format!("Truncated header in {}: {e}", path.display()))
    })?;
    let version = u16::from_le_bytes(version);
    if version != SNAPSHOT_VERSION {
        return Err(AppError::SnapshotError(format!(
            "{} has format version {version}, expected {SNAPSHOT_VERSION}",
            path.display()
        )));
    }

    let records: Vec<Record> = bincode::deserialize_from(reader).map_err(|e| {
        AppError::SnapshotError(format!("Failed to decode {}: {e}", path.display()))
    })?;

    info!(path = %path.display(), records = records.len(), "Snapshot read");
    Ok(records)
}
