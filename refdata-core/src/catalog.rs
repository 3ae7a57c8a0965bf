//! The YAML dataset catalog.
//!
//! # Storage layout
//!
//! ```text
//! <root>/
//!   refdata.yaml          (catalog — optional; builtin defaults when absent)
//!   <dataset artifacts>   (raw/output/version files, paths per DatasetSpec)
//! ```
//!
//! # API pattern
//!
//! Loading takes an explicit `root: &Path` so tests run against a `TempDir`
//! instead of the process working directory.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::types::{Catalog, ColumnSpec, DatasetName, DatasetSpec, FetchSpec, LocatorSpec};

/// File name of the catalog inside the data root.
pub const CATALOG_FILE: &str = "refdata.yaml";

/// `<root>/refdata.yaml` — pure, no I/O.
pub fn catalog_path_at(root: &Path) -> PathBuf {
    root.join(CATALOG_FILE)
}

/// Load the catalog from `<root>/refdata.yaml`.
///
/// Falls back to [`builtin`] when the file does not exist; malformed YAML is
/// a `ConfigError::Parse` with path and line context.
pub fn load_at(root: &Path) -> Result<Catalog, ConfigError> {
    let path = catalog_path_at(root);
    if !path.exists() {
        return Ok(builtin());
    }
    let contents = std::fs::read_to_string(&path)?;
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse { path, source: e })
}

/// Load a catalog from an explicit file path. Unlike [`load_at`], a missing
/// file here is an error — the caller asked for this exact catalog.
pub fn load_file(path: &Path) -> Result<Catalog, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Atomically save a catalog to `<root>/refdata.yaml`.
///
/// Write flow: serialize → `.yaml.tmp` sibling → `rename`. The `.tmp` lives
/// in the same directory as the target (same filesystem — no EXDEV).
pub fn save_at(root: &Path, catalog: &Catalog) -> Result<(), ConfigError> {
    let path = catalog_path_at(root);
    let tmp_path = path.with_extension("yaml.tmp");
    let yaml = serde_yaml::to_string(catalog)?;
    std::fs::write(&tmp_path, yaml)?;
    std::fs::rename(&tmp_path, &path)?;
    Ok(())
}

fn column(source: &str) -> ColumnSpec {
    ColumnSpec {
        source: source.to_owned(),
        rename: None,
    }
}

/// The built-in production catalog: US cities (SimpleMaps) and US counties
/// (OpenDataSoft).
pub fn builtin() -> Catalog {
    Catalog {
        version: 1,
        datasets: vec![
            DatasetSpec {
                name: DatasetName::from("cities"),
                locator: LocatorSpec::Scrape {
                    page_url: "https://simplemaps.com/data/us-cities".to_owned(),
                    pattern: r"us-cities/([\d\.]+)/basic/simplemaps_uscities_basicv[\d\.]+\.zip"
                        .to_owned(),
                    download_template:
                        "https://simplemaps.com/static/data/us-cities/{version}/basic/simplemaps_uscities_basicv{version}.zip"
                            .to_owned(),
                },
                fetch: FetchSpec::Archive {
                    member: "uscities.csv".to_owned(),
                },
                columns: vec![
                    column("city"),
                    column("state_id"),
                    column("state_name"),
                    column("county_fips"),
                    column("county_name"),
                    column("lat"),
                    column("lng"),
                    column("population"),
                ],
                raw_path: PathBuf::from("uscities.csv"),
                output_path: PathBuf::from("city_population.json"),
                version_path: PathBuf::from("latest_city_version.txt"),
            },
            DatasetSpec {
                name: DatasetName::from("counties"),
                locator: LocatorSpec::Probe {
                    url: "https://public.opendatasoft.com/api/explore/v2.1/catalog/datasets/georef-united-states-of-america-county/exports/csv?lang=en&timezone=America%2FNew_York"
                        .to_owned(),
                    header: "Last-Modified".to_owned(),
                },
                fetch: FetchSpec::Direct,
                columns: vec![
                    column("ste_code"),
                    column("ste_name"),
                    column("coty_code"),
                    column("coty_name"),
                ],
                raw_path: PathBuf::from("counties.csv"),
                output_path: PathBuf::from("counties.json"),
                version_path: PathBuf::from("latest_county_version.txt"),
            },
        ],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
