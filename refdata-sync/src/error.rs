//! Error types for refdata-sync.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from pipeline operations.
///
/// The first four variants map one-to-one onto the terminal failure states
/// of a dataset run; [`crate::pipeline::sync_dataset`] converts them into a
/// [`crate::SyncOutcome`] instead of letting them escape.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Upstream version discovery failed — page unreachable, pattern not
    /// found, or metadata header missing.
    #[error("version check failed: {reason}")]
    Check { reason: String },

    /// Download failed — non-success response, corrupt archive, or the
    /// expected archive member was absent.
    #[error("fetch failed: {reason}")]
    Fetch { reason: String },

    /// The raw table could not be normalized — malformed delimited data or
    /// a declared column missing from the header.
    #[error("transform failed: {reason}")]
    Transform { reason: String },

    /// A disk write failed, with annotated path for context.
    #[error("persist failed at {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`SyncError::Check`].
pub(crate) fn check_err(reason: impl Into<String>) -> SyncError {
    SyncError::Check {
        reason: reason.into(),
    }
}

/// Convenience constructor for [`SyncError::Fetch`].
pub(crate) fn fetch_err(reason: impl Into<String>) -> SyncError {
    SyncError::Fetch {
        reason: reason.into(),
    }
}

/// Convenience constructor for [`SyncError::Transform`].
pub(crate) fn transform_err(reason: impl Into<String>) -> SyncError {
    SyncError::Transform {
        reason: reason.into(),
    }
}

/// Convenience constructor for [`SyncError::Persist`].
pub(crate) fn persist_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Persist {
        path: path.into(),
        source,
    }
}
