//! `refdata check` — read-only freshness probe.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;

use refdata_sync::{check_dataset, CheckReport, UreqClient};

/// Arguments for `refdata check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Data root holding the stored version records.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Explicit catalog file (defaults to `<root>/refdata.yaml`).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Check a single dataset instead of the whole catalog.
    #[arg(long)]
    pub dataset: Option<String>,
}

impl CheckArgs {
    pub fn run(self) -> Result<()> {
        let catalog = super::load_catalog(&self.root, self.config.as_deref())?;
        let datasets = super::select_datasets(&catalog, self.dataset.as_deref())?;
        if datasets.is_empty() {
            println!("No datasets configured.");
            return Ok(());
        }

        let http = UreqClient::new();
        let mut all_failed = true;
        for spec in &datasets {
            let report = check_dataset(spec, &http, &self.root);
            if !matches!(report, CheckReport::CheckFailed { .. }) {
                all_failed = false;
            }
            match report {
                CheckReport::UpToDate { version } => {
                    println!("· {}: up to date (version {version})", spec.name);
                }
                CheckReport::UpdateAvailable {
                    stored: Some(stored),
                    latest,
                } => {
                    println!(
                        "{} {}: update available {stored} -> {latest}",
                        "↑".green(),
                        spec.name
                    );
                }
                CheckReport::UpdateAvailable {
                    stored: None,
                    latest,
                } => {
                    println!(
                        "{} {}: never synced; upstream at {latest}",
                        "↑".green(),
                        spec.name
                    );
                }
                CheckReport::CheckFailed { reason } => {
                    println!("{} {}: {reason}", "✗".red(), spec.name);
                }
            }
        }

        if all_failed {
            bail!("failed to check for updates for every dataset");
        }
        Ok(())
    }
}
