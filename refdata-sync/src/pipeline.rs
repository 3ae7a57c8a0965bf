//! Per-dataset sync pipeline.
//!
//! One run of one dataset walks `Locating → Comparing → (UpToDate |
//! Fetching → Transforming → Persisting → Updated)`. Every failure state is
//! terminal for that dataset within the run: no retries, no rollback — the
//! stored version record and output artifact are simply left untouched.
//!
//! The version record is written strictly after the output artifact, so the
//! two always describe the same release.

use std::path::Path;

use refdata_core::{DatasetName, DatasetSpec, Version};

use crate::error::SyncError;
use crate::http::HttpClient;
use crate::{fetch, locate, transform, version_store};

/// Terminal state of one dataset's run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    /// Fetch + transform + persist all succeeded; the version advanced.
    Updated {
        old: Option<Version>,
        new: Version,
    },
    /// Upstream version equals the stored version; nothing was written.
    UpToDate { version: Version },
    /// Version discovery failed (page unreachable, pattern miss, header gone).
    CheckFailed { reason: String },
    /// Download or archive extraction failed.
    FetchFailed { reason: String },
    /// The raw table could not be normalized.
    TransformFailed { reason: String },
    /// A disk write failed.
    PersistFailed { reason: String },
}

impl SyncStatus {
    pub fn is_failure(&self) -> bool {
        !matches!(self, SyncStatus::Updated { .. } | SyncStatus::UpToDate { .. })
    }

    /// Stable machine-readable key, used by the CLI's JSON output.
    pub fn key(&self) -> &'static str {
        match self {
            SyncStatus::Updated { .. } => "updated",
            SyncStatus::UpToDate { .. } => "up_to_date",
            SyncStatus::CheckFailed { .. } => "check_failed",
            SyncStatus::FetchFailed { .. } => "fetch_failed",
            SyncStatus::TransformFailed { .. } => "transform_failed",
            SyncStatus::PersistFailed { .. } => "persist_failed",
        }
    }
}

/// Outcome of one dataset's run. Exactly one per dataset per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub dataset: DatasetName,
    pub status: SyncStatus,
}

/// Result of a read-only freshness probe ([`check_dataset`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckReport {
    UpToDate {
        version: Version,
    },
    UpdateAvailable {
        stored: Option<Version>,
        latest: Version,
    },
    CheckFailed {
        reason: String,
    },
}

/// Run the full pipeline for one dataset.
///
/// Never returns an error: every failure is folded into the outcome so the
/// caller's loop over datasets cannot be aborted by one bad upstream.
pub fn sync_dataset(spec: &DatasetSpec, http: &dyn HttpClient, root: &Path) -> SyncOutcome {
    let status = match run_dataset(spec, http, root) {
        Ok(status) => status,
        Err(err) => failure_status(err),
    };
    if status.is_failure() {
        tracing::warn!("dataset '{}' failed: {}", spec.name, describe(&status));
    } else {
        tracing::info!("dataset '{}': {}", spec.name, describe(&status));
    }
    SyncOutcome {
        dataset: spec.name.clone(),
        status,
    }
}

fn run_dataset(
    spec: &DatasetSpec,
    http: &dyn HttpClient,
    root: &Path,
) -> Result<SyncStatus, SyncError> {
    let (latest, locator) = locate::locate(spec, http)?;
    let stored = version_store::read(&root.join(&spec.version_path))?;

    // "New" means "not equal to stored" — tokens are opaque and unordered.
    if stored.as_ref() == Some(&latest) {
        return Ok(SyncStatus::UpToDate { version: latest });
    }

    let raw = fetch::fetch(spec, &locator, http, root)?;
    let records = transform::transform(spec, &raw)?;
    transform::write_output(spec, &records, root)?;

    // Version advances only after the artifact is fully on disk.
    version_store::write(&root.join(&spec.version_path), &latest)?;

    Ok(SyncStatus::Updated {
        old: stored,
        new: latest,
    })
}

/// Run every dataset, isolating failures: one dataset's outcome never
/// affects whether the rest run.
pub fn sync_all(datasets: &[DatasetSpec], http: &dyn HttpClient, root: &Path) -> Vec<SyncOutcome> {
    datasets
        .iter()
        .map(|spec| sync_dataset(spec, http, root))
        .collect()
}

/// Read-only freshness probe: locate and compare, but never write.
pub fn check_dataset(spec: &DatasetSpec, http: &dyn HttpClient, root: &Path) -> CheckReport {
    let (latest, _) = match locate::locate(spec, http) {
        Ok(located) => located,
        Err(err) => {
            return CheckReport::CheckFailed {
                reason: err.to_string(),
            }
        }
    };
    let stored = match version_store::read(&root.join(&spec.version_path)) {
        Ok(stored) => stored,
        Err(err) => {
            return CheckReport::CheckFailed {
                reason: err.to_string(),
            }
        }
    };
    if stored.as_ref() == Some(&latest) {
        CheckReport::UpToDate { version: latest }
    } else {
        CheckReport::UpdateAvailable { stored, latest }
    }
}

fn failure_status(err: SyncError) -> SyncStatus {
    match err {
        SyncError::Check { reason } => SyncStatus::CheckFailed { reason },
        SyncError::Fetch { reason } => SyncStatus::FetchFailed { reason },
        SyncError::Transform { reason } => SyncStatus::TransformFailed { reason },
        SyncError::Persist { path, source } => SyncStatus::PersistFailed {
            reason: format!("{}: {source}", path.display()),
        },
    }
}

fn describe(status: &SyncStatus) -> String {
    match status {
        SyncStatus::Updated { old, new } => match old {
            Some(old) => format!("updated {old} -> {new}"),
            None => format!("first sync at {new}"),
        },
        SyncStatus::UpToDate { version } => format!("up to date ({version})"),
        SyncStatus::CheckFailed { reason }
        | SyncStatus::FetchFailed { reason }
        | SyncStatus::TransformFailed { reason }
        | SyncStatus::PersistFailed { reason } => reason.clone(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
