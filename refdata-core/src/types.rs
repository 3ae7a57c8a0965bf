//! Domain types for the refdata catalog.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.
//! Paths inside a [`DatasetSpec`] are relative to the data root supplied at
//! run time. All types are serializable/deserializable via serde + serde_yaml.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed name for a dataset entry in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetName(pub String);

impl fmt::Display for DatasetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for DatasetName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DatasetName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// An opaque upstream release token.
///
/// A version is compared for equality only — a release tag and an HTTP
/// `Last-Modified` value are both valid tokens, and neither is ordered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Version(pub String);

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Version {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Version {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Locator and fetch strategies
// ---------------------------------------------------------------------------

/// How the current upstream version (and download URL) is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LocatorSpec {
    /// Fetch a listing page and extract the version with a regex; capture
    /// group 1 is the version token. The download URL is derived by
    /// substituting `{version}` into `download_template`.
    Scrape {
        page_url: String,
        pattern: String,
        download_template: String,
    },
    /// Issue a HEAD request against a fixed resource and use a response
    /// header as the version token. The resource URL doubles as the
    /// download URL.
    Probe { url: String, header: String },
}

/// How the downloaded bytes yield the raw table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FetchSpec {
    /// The download is a zip archive; extract exactly the named member.
    Archive { member: String },
    /// The download body is the raw table itself.
    Direct,
}

/// One projected output column.
///
/// `source` names the column in the raw table header; `rename`, when set,
/// is the field name used in the output artifact. Declared order is output
/// field order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rename: Option<String>,
}

impl ColumnSpec {
    /// The field name this column takes in the output artifact.
    pub fn output_name(&self) -> &str {
        self.rename.as_deref().unwrap_or(&self.source)
    }
}

// ---------------------------------------------------------------------------
// Dataset spec and catalog
// ---------------------------------------------------------------------------

/// Static per-dataset configuration, immutable for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSpec {
    pub name: DatasetName,
    pub locator: LocatorSpec,
    pub fetch: FetchSpec,
    /// Columns projected into the output artifact, in output order.
    pub columns: Vec<ColumnSpec>,
    /// Where the fetched raw table is materialized (relative to the root).
    pub raw_path: PathBuf,
    /// Where the normalized JSON artifact is written (relative to the root).
    pub output_path: PathBuf,
    /// Where the last-applied version token is recorded (relative to the root).
    pub version_path: PathBuf,
}

/// Root of the refdata YAML catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Catalog {
    pub version: u32,
    #[serde(default)]
    pub datasets: Vec<DatasetSpec>,
}

impl Catalog {
    /// Find a dataset by name.
    pub fn dataset(&self, name: &str) -> Option<&DatasetSpec> {
        self.datasets.iter().find(|d| d.name.0 == name)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
