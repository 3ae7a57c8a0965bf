//! Atomic file writes.
//!
//! Every file the pipeline persists — raw table, output artifact, version
//! record, status report — goes through [`atomic_write`]: write to a
//! `.refdata.tmp` sibling, then rename onto the final path. An interrupted
//! or failed write never leaves a partial file where a reader could see it.

use std::path::{Path, PathBuf};

use crate::error::{persist_err, SyncError};

/// Atomically write `bytes` to `path`.
///
/// Parent directories are created as needed. The `.refdata.tmp` sibling is
/// removed if the final rename fails, leaving any prior file untouched.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<(), SyncError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| persist_err(parent, e))?;
        }
    }

    let tmp = PathBuf::from(format!("{}.refdata.tmp", path.display()));
    std::fs::write(&tmp, bytes).map_err(|e| persist_err(&tmp, e))?;

    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(persist_err(path, e));
    }
    Ok(())
}
