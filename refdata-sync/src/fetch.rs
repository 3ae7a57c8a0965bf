//! Raw table retrieval.
//!
//! Downloads the located release and materializes the raw table at the
//! dataset's `raw_path` (relative to the data root). Archive releases have
//! exactly one expected member extracted; direct releases are the table
//! itself. The materialization is atomic — a failed fetch never leaves a
//! partial raw file for the transformer to trip over.

use std::io::{Cursor, Read};
use std::path::Path;

use refdata_core::{DatasetSpec, FetchSpec};

use crate::error::{fetch_err, SyncError};
use crate::http::HttpClient;
use crate::locate::FetchLocator;
use crate::writer::atomic_write;

/// Download the raw table for `spec`, write it to `<root>/<raw_path>`, and
/// return its bytes for the transform stage.
pub fn fetch(
    spec: &DatasetSpec,
    locator: &FetchLocator,
    http: &dyn HttpClient,
    root: &Path,
) -> Result<Vec<u8>, SyncError> {
    let response = http
        .get(&locator.0)
        .map_err(|e| fetch_err(e.to_string()))?;
    if !response.is_success() {
        return Err(fetch_err(format!(
            "download of {} returned HTTP {}",
            locator.0, response.status
        )));
    }

    let raw = match &spec.fetch {
        FetchSpec::Archive { member } => extract_member(&response.body, member)?,
        FetchSpec::Direct => response.body,
    };

    tracing::debug!(
        "fetched {} bytes for '{}' from {}",
        raw.len(),
        spec.name,
        locator.0
    );

    atomic_write(&root.join(&spec.raw_path), &raw)?;
    Ok(raw)
}

/// Extract exactly the named member from a zip archive.
fn extract_member(archive_bytes: &[u8], member: &str) -> Result<Vec<u8>, SyncError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(archive_bytes))
        .map_err(|e| fetch_err(format!("corrupt archive: {e}")))?;
    let mut file = archive
        .by_name(member)
        .map_err(|e| fetch_err(format!("archive member '{member}': {e}")))?;
    let mut contents = Vec::new();
    file.read_to_end(&mut contents)
        .map_err(|e| fetch_err(format!("failed to read archive member '{member}': {e}")))?;
    Ok(contents)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
