//! Injected publish capability.
//!
//! The pipeline itself has zero dependency on any version-control tool; the
//! binary decides whether and how updated artifacts leave the machine. The
//! CLI's git-backed implementation lives in `refdata-cli`.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to publish updated artifacts.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("publish command `{command}` failed: {reason}")]
    Command { command: String, reason: String },

    #[error("I/O error running {command}: {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Push a set of changed files somewhere with a message.
pub trait Publisher {
    fn publish(&self, files: &[PathBuf], message: &str) -> Result<(), PublishError>;
}

/// Publisher that does nothing. Used by tests and `--no-publish`.
pub struct NoopPublisher;

impl Publisher for NoopPublisher {
    fn publish(&self, _files: &[PathBuf], _message: &str) -> Result<(), PublishError> {
        Ok(())
    }
}
