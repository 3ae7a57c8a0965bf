//! `refdata status` — offline view of stored versions and artifacts.
//!
//! Reads only local state: version records, output artifacts, and the last
//! run's status report. Never touches the network.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use refdata_core::DatasetSpec;
use refdata_sync::{status, version_store};

/// Arguments for `refdata status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Data root holding artifacts, version records, and the status report.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Explicit catalog file (defaults to `<root>/refdata.yaml`).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone)]
struct DatasetState {
    dataset: String,
    version: Option<String>,
    records: Option<usize>,
    artifact_present: bool,
    last_update_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct StatusJson {
    summary: SummaryJson,
    datasets: Vec<DatasetJson>,
}

#[derive(Serialize)]
struct SummaryJson {
    datasets: usize,
    synced: usize,
}

#[derive(Serialize)]
struct DatasetJson {
    dataset: String,
    version: Option<String>,
    records: Option<usize>,
    artifact: bool,
    last_update_at: Option<String>,
    last_update_age: String,
}

#[derive(Tabled)]
struct StatusTableRow {
    #[tabled(rename = "dataset")]
    dataset: String,
    #[tabled(rename = "version")]
    version: String,
    #[tabled(rename = "records")]
    records: String,
    #[tabled(rename = "last update")]
    last_update: String,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let catalog = super::load_catalog(&self.root, self.config.as_deref())?;
        let states = catalog
            .datasets
            .iter()
            .map(|spec| dataset_state(&self.root, spec))
            .collect::<Result<Vec<_>>>()?;

        if self.json {
            print_json(&states)?;
            return Ok(());
        }
        print_table(&self.root, &states);
        Ok(())
    }
}

fn dataset_state(root: &Path, spec: &DatasetSpec) -> Result<DatasetState> {
    let version_path = root.join(&spec.version_path);
    let version = version_store::read(&version_path)
        .with_context(|| format!("failed to read version record for '{}'", spec.name))?
        .map(|v| v.0);

    let output_path = root.join(&spec.output_path);
    let artifact_present = output_path.exists();
    let records = if artifact_present {
        std::fs::read_to_string(&output_path)
            .ok()
            .and_then(|s| serde_json::from_str::<Vec<serde_json::Value>>(&s).ok())
            .map(|rows| rows.len())
    } else {
        None
    };

    let last_update_at = std::fs::metadata(&version_path)
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::<Utc>::from);

    Ok(DatasetState {
        dataset: spec.name.to_string(),
        version,
        records,
        artifact_present,
        last_update_at,
    })
}

fn format_age(timestamp: DateTime<Utc>) -> String {
    let seconds = Utc::now()
        .signed_duration_since(timestamp)
        .num_seconds()
        .max(0) as u64;
    if seconds < 60 {
        return format!("{seconds}s");
    }
    if seconds < 60 * 60 {
        return format!("{}m", seconds / 60);
    }
    if seconds < 60 * 60 * 24 {
        return format!("{}h", seconds / (60 * 60));
    }
    format!("{}d", seconds / (60 * 60 * 24))
}

fn print_json(states: &[DatasetState]) -> Result<()> {
    let payload = StatusJson {
        summary: SummaryJson {
            datasets: states.len(),
            synced: states.iter().filter(|s| s.version.is_some()).count(),
        },
        datasets: states
            .iter()
            .map(|state| DatasetJson {
                dataset: state.dataset.clone(),
                version: state.version.clone(),
                records: state.records,
                artifact: state.artifact_present,
                last_update_at: state.last_update_at.map(|t| t.to_rfc3339()),
                last_update_age: state
                    .last_update_at
                    .map(format_age)
                    .unwrap_or_else(|| "never".to_string()),
            })
            .collect(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize status JSON")?
    );
    Ok(())
}

fn print_table(root: &Path, states: &[DatasetState]) {
    println!(
        "refdata v{} | {} datasets | {} synced",
        env!("CARGO_PKG_VERSION"),
        states.len(),
        states.iter().filter(|s| s.version.is_some()).count(),
    );

    if states.is_empty() {
        println!("No datasets configured.");
        return;
    }

    let rows: Vec<StatusTableRow> = states
        .iter()
        .map(|state| StatusTableRow {
            dataset: state.dataset.clone(),
            version: state
                .version
                .clone()
                .unwrap_or_else(|| "—".to_string()),
            records: match (state.artifact_present, state.records) {
                (true, Some(n)) => n.to_string(),
                (true, None) => "unparsable".to_string(),
                (false, _) => "missing".to_string(),
            },
            last_update: state
                .last_update_at
                .map(format_age)
                .unwrap_or_else(|| "never".to_string()),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    let report_path = root.join(status::STATUS_FILE);
    if let Ok(report) = std::fs::read_to_string(&report_path) {
        println!("{}", "Last run:".bold());
        for line in report.lines() {
            println!("  {line}");
        }
    }
}
