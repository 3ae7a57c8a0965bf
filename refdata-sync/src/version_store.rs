//! Per-dataset version record.
//!
//! A version record is a single trimmed UTF-8 token in a text file. A
//! missing file means "no prior version" (first run) and is never an error.
//! Writes use the same atomic tmp + rename pattern as every other persisted
//! file.

use std::io::ErrorKind;
use std::path::Path;

use refdata_core::Version;

use crate::error::{persist_err, SyncError};
use crate::writer::atomic_write;

/// Read the last-applied version from `path`.
///
/// Returns `Ok(None)` when no record exists yet; the token is trimmed of
/// surrounding whitespace.
pub fn read(path: &Path) -> Result<Option<Version>, SyncError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let token = contents.trim();
            if token.is_empty() {
                return Ok(None);
            }
            Ok(Some(Version::from(token)))
        }
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(persist_err(path, err)),
    }
}

/// Atomically record `version` at `path`.
pub fn write(path: &Path, version: &Version) -> Result<(), SyncError> {
    atomic_write(path, version.0.as_bytes())
}
