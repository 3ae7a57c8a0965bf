pub mod check;
pub mod status;
pub mod sync;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use refdata_core::{catalog, Catalog, ConfigError, DatasetSpec};

/// Load the catalog: an explicit `--config` file when given, otherwise
/// `<root>/refdata.yaml`, otherwise the builtin datasets.
pub fn load_catalog(root: &Path, config: Option<&Path>) -> Result<Catalog> {
    match config {
        Some(path) => catalog::load_file(path)
            .with_context(|| format!("failed to load catalog {}", path.display())),
        None => catalog::load_at(root).context("failed to load catalog"),
    }
}

/// Resolve `--dataset` against the catalog; no filter means every dataset.
pub fn select_datasets(catalog: &Catalog, name: Option<&str>) -> Result<Vec<DatasetSpec>> {
    match name {
        Some(name) => {
            let spec = catalog.dataset(name).ok_or(ConfigError::DatasetNotFound {
                name: name.to_owned(),
            })?;
            Ok(vec![spec.clone()])
        }
        None => Ok(catalog.datasets.clone()),
    }
}

/// Files a successful update changed for one dataset, relative to the root.
pub fn changed_files(spec: &DatasetSpec) -> Vec<PathBuf> {
    vec![spec.output_path.clone(), spec.version_path.clone()]
}
