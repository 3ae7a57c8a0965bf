//! Error types for refdata-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from catalog operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (file not found, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error (write/save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load — includes file path and line context from serde_yaml.
    #[error("failed to parse catalog at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A dataset name was requested that the catalog does not contain.
    #[error("dataset '{name}' not found in catalog")]
    DatasetNotFound { name: String },
}
