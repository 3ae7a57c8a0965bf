//! Git-backed publisher.
//!
//! Stages the changed files, commits, and pushes from the data root. The
//! pipeline never sees this; it is injected by the sync command only after
//! at least one dataset actually updated.

use std::path::PathBuf;
use std::process::Command;

use refdata_sync::{PublishError, Publisher};

pub struct GitPublisher {
    root: PathBuf,
    remote: String,
    branch: String,
}

impl GitPublisher {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            remote: "origin".to_string(),
            branch: "main".to_string(),
        }
    }

    fn run_git(&self, args: &[&str]) -> Result<(), PublishError> {
        let command = format!("git {}", args.join(" "));
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .map_err(|e| PublishError::Io {
                command: command.clone(),
                source: e,
            })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Err(PublishError::Command {
            command,
            reason: format!("status {}: {stdout} {stderr}", output.status),
        })
    }
}

impl Publisher for GitPublisher {
    fn publish(&self, files: &[PathBuf], message: &str) -> Result<(), PublishError> {
        let mut add_args = vec!["add".to_string()];
        for file in files {
            add_args.push(file.display().to_string());
        }
        let add_refs: Vec<&str> = add_args.iter().map(String::as_str).collect();
        self.run_git(&add_refs)?;
        self.run_git(&["commit", "-m", message])?;
        self.run_git(&["push", &self.remote, &self.branch])
    }
}
