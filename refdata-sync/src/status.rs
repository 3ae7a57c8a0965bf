//! Status report — the single source of truth for what happened last run.
//!
//! One human-readable line per configured dataset, aggregated and written
//! once after every dataset has been processed. The file is overwritten
//! atomically each run; datasets outside a narrowed run keep their line from
//! the previous report.

use std::path::Path;

use refdata_core::DatasetName;

use crate::error::SyncError;
use crate::pipeline::{SyncOutcome, SyncStatus};
use crate::writer::atomic_write;

/// File name of the status artifact inside the data root.
pub const STATUS_FILE: &str = "update_status.txt";

/// Render one outcome to its report line.
pub fn render(outcome: &SyncOutcome) -> String {
    let name = &outcome.dataset;
    match &outcome.status {
        SyncStatus::Updated { old: Some(old), new } => {
            format!("✅ {name}: updated to version {new} (was {old})")
        }
        SyncStatus::Updated { old: None, new } => {
            format!("✅ {name}: first sync at version {new}")
        }
        SyncStatus::UpToDate { version } => {
            format!("✅ {name}: up to date (version {version})")
        }
        SyncStatus::CheckFailed { reason } => {
            format!("❌ {name}: failed to check for updates — {reason}")
        }
        SyncStatus::FetchFailed { reason } => {
            format!("❌ {name}: download failed — {reason}")
        }
        SyncStatus::TransformFailed { reason } => {
            format!("❌ {name}: transform failed — {reason}")
        }
        SyncStatus::PersistFailed { reason } => {
            format!("❌ {name}: write failed — {reason}")
        }
    }
}

/// Write the aggregated report to `<root>/update_status.txt`, one line per
/// configured dataset, overwriting any previous report.
///
/// `datasets` is the full configured list, in catalog order. A dataset not
/// covered by `outcomes` (a run narrowed to a single dataset) keeps its line
/// from the previous report, so the artifact always reflects every
/// configured dataset.
pub fn write_report(
    root: &Path,
    datasets: &[DatasetName],
    outcomes: &[SyncOutcome],
) -> Result<(), SyncError> {
    let prior = prior_lines(root);
    let mut lines = Vec::new();
    for name in datasets {
        if let Some(outcome) = outcomes.iter().find(|o| &o.dataset == name) {
            lines.push(render(outcome));
        } else if let Some(line) = prior
            .iter()
            .find(|l| line_dataset(l) == Some(name.0.as_str()))
        {
            lines.push(line.clone());
        }
    }
    let mut report = lines.join("\n");
    report.push('\n');
    atomic_write(&root.join(STATUS_FILE), report.as_bytes())
}

fn prior_lines(root: &Path) -> Vec<String> {
    std::fs::read_to_string(root.join(STATUS_FILE))
        .map(|contents| contents.lines().map(str::to_owned).collect())
        .unwrap_or_default()
}

/// Dataset name a report line refers to: the token between the outcome
/// marker and the first colon.
fn line_dataset(line: &str) -> Option<&str> {
    let (_, rest) = line.split_once(' ')?;
    rest.split_once(':').map(|(name, _)| name)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
