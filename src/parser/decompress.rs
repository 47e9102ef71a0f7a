use crate::errors::{AppError, AppResult};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use xz2::read::XzDecoder;

/// Compression wrapper recognised from a file's final extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Xz,
    Gzip,
}

impl Compression {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("xz") => Self::Xz,
            Some(ext) if ext.eq_ignore_ascii_case("gz") => Self::Gzip,
            _ => Self::None,
        }
    }
}

/// Opens `path` for reading, decompressing transparently by extension.
///
/// Corrupt compressed data is not detected here; it surfaces as an I/O error from
/// the returned reader while the XML is being read.
pub fn open_backup(path: &Path) -> AppResult<Box<dyn BufRead>> {
    let file = File::open(path)
        .map_err(|e| AppError::IoError(format!("Failed to open {}: {e}", path.display())))?;

    let reader: Box<dyn BufRead> = match Compression::from_path(path) {
        Compression::Xz => Box::new(BufReader::new(XzDecoder::new(file))),
        Compression::Gzip => Box::new(BufReader::new(GzDecoder::new(file))),
        Compression::None => Box::new(BufReader::new(file)),
    };
    Ok(reader)
}
