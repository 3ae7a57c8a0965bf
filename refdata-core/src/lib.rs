//! Refdata core library — domain types, dataset catalog, errors.
//!
//! Public API surface:
//! - [`types`] — newtypes and dataset specs
//! - [`error`] — [`ConfigError`]
//! - [`catalog`] — load / save / builtin datasets

pub mod catalog;
pub mod error;
pub mod types;

pub use error::ConfigError;
pub use types::{
    Catalog, ColumnSpec, DatasetName, DatasetSpec, FetchSpec, LocatorSpec, Version,
};
