//! Content fingerprints for records.
//!
//! The canonical form is the compact JSON of [`Record::view`]: fixed field order,
//! attributes in key order, absent text and empty children omitted. SHA-256 over
//! its UTF-8 bytes gives the fingerprint.

use crate::errors::AppResult;
use crate::models::Record;
use sha2::{Digest, Sha256};
use std::fmt;

/// SHA-256 digest of a record's canonical serialization.
///
/// Only meaningful for equality and set membership.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({self})")
    }
}

/// Byte-deterministic text encoding of a record.
pub fn canonical_json(record: &Record) -> AppResult<String> {
    Ok(serde_json::to_string(&record.view())?)
}

/// Hashes the canonical form of `record`, streaming it straight into the digest.
pub fn fingerprint(record: &Record) -> AppResult<Fingerprint> {
    let mut hasher = Sha256::new();
    serde_json::to_writer(&mut hasher, &record.view())?;
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&hasher.finalize());
    Ok(Fingerprint(digest))
}
