//! # refdata-sync
//!
//! Version-gated dataset synchronization pipeline.
//!
//! Call [`sync_dataset`] to bring a single dataset up to date with its
//! upstream release, or [`sync_all`] to process every dataset in a catalog.
//! Failures never escape the pipeline boundary; every run of a dataset
//! yields exactly one [`SyncOutcome`].

pub mod error;
pub mod fetch;
pub mod http;
pub mod locate;
pub mod pipeline;
pub mod publish;
pub mod status;
pub mod transform;
pub mod version_store;
pub mod writer;

pub use error::SyncError;
pub use http::{HttpClient, HttpError, HttpResponse, UreqClient};
pub use locate::FetchLocator;
pub use pipeline::{check_dataset, sync_all, sync_dataset, CheckReport, SyncOutcome, SyncStatus};
pub use publish::{NoopPublisher, PublishError, Publisher};
