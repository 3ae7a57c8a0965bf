//! `refdata sync` — run the pipeline and persist the status report.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use refdata_core::DatasetName;
use refdata_sync::{
    status, sync_all, NoopPublisher, Publisher, SyncOutcome, SyncStatus, UreqClient,
};

use crate::git::GitPublisher;

/// Arguments for `refdata sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Data root holding artifacts, version records, and the status report.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Explicit catalog file (defaults to `<root>/refdata.yaml`).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Sync a single dataset instead of the whole catalog.
    #[arg(long)]
    pub dataset: Option<String>,

    /// Skip committing and pushing updated artifacts.
    #[arg(long)]
    pub no_publish: bool,

    /// Emit machine-readable JSON outcomes instead of report lines.
    #[arg(long)]
    pub json: bool,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let catalog = super::load_catalog(&self.root, self.config.as_deref())?;
        let datasets = super::select_datasets(&catalog, self.dataset.as_deref())?;
        if datasets.is_empty() {
            println!("No datasets configured.");
            return Ok(());
        }

        let http = UreqClient::new();
        let outcomes = sync_all(&datasets, &http, &self.root);

        // The status artifact reflects every configured dataset, written
        // once after the loop; a `--dataset` run only replaces its own line.
        let configured: Vec<DatasetName> =
            catalog.datasets.iter().map(|d| d.name.clone()).collect();
        status::write_report(&self.root, &configured, &outcomes)
            .context("failed to write status report")?;

        if self.json {
            print_json(&outcomes)?;
        } else {
            for outcome in &outcomes {
                let line = status::render(outcome);
                if outcome.status.is_failure() {
                    println!("{}", line.red());
                } else {
                    println!("{line}");
                }
            }
        }

        let updated: Vec<_> = outcomes
            .iter()
            .filter(|o| matches!(o.status, SyncStatus::Updated { .. }))
            .collect();

        if !updated.is_empty() {
            let mut files: Vec<PathBuf> = updated
                .iter()
                .filter_map(|o| datasets.iter().find(|d| d.name == o.dataset))
                .flat_map(super::changed_files)
                .collect();
            files.push(PathBuf::from(status::STATUS_FILE));

            let names: Vec<String> = updated.iter().map(|o| o.dataset.to_string()).collect();
            let message = format!("Automated update of {}", names.join(", "));
            let publisher: Box<dyn Publisher> = if self.no_publish {
                Box::new(NoopPublisher)
            } else {
                Box::new(GitPublisher::new(self.root.clone()))
            };
            publisher
                .publish(&files, &message)
                .context("publish failed")?;
            if !self.no_publish {
                println!("Published {} updated dataset(s).", updated.len());
            }
        }

        // A total inability to even check for updates is fatal; partial
        // failures are recorded in the status report and exit cleanly.
        if outcomes
            .iter()
            .all(|o| matches!(o.status, SyncStatus::CheckFailed { .. }))
        {
            bail!("failed to check for updates for every dataset — see update_status.txt");
        }

        Ok(())
    }
}

fn print_json(outcomes: &[SyncOutcome]) -> Result<()> {
    let payload: Vec<serde_json::Value> = outcomes
        .iter()
        .map(|outcome| {
            serde_json::json!({
                "dataset": outcome.dataset.to_string(),
                "status": outcome.status.key(),
                "detail": status::render(outcome),
            })
        })
        .collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize sync outcomes")?
    );
    Ok(())
}
