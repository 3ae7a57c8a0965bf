//! Upstream version discovery.
//!
//! Two locator strategies, selected per dataset by
//! [`LocatorSpec`](refdata_core::LocatorSpec):
//!
//! - **scrape** — GET a listing page and extract the release tag with a
//!   regex, then substitute it into a download URL template;
//! - **probe** — HEAD a fixed resource and use a response header (typically
//!   `Last-Modified`) as the version token.
//!
//! Upstream shape drift — a moved page, a reworded listing, a dropped
//! header — is a [`SyncError::Check`], never a panic. The pipeline reports
//! it and moves on to the next dataset.

use regex::Regex;

use refdata_core::{DatasetSpec, LocatorSpec, Version};

use crate::error::{check_err, SyncError};
use crate::http::HttpClient;

/// A resolved download target for the fetch stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchLocator(pub String);

/// Resolve the current upstream version and download locator for a dataset.
pub fn locate(
    spec: &DatasetSpec,
    http: &dyn HttpClient,
) -> Result<(Version, FetchLocator), SyncError> {
    match &spec.locator {
        LocatorSpec::Scrape {
            page_url,
            pattern,
            download_template,
        } => scrape(http, page_url, pattern, download_template),
        LocatorSpec::Probe { url, header } => probe(http, url, header),
    }
}

fn scrape(
    http: &dyn HttpClient,
    page_url: &str,
    pattern: &str,
    download_template: &str,
) -> Result<(Version, FetchLocator), SyncError> {
    let response = http
        .get(page_url)
        .map_err(|e| check_err(e.to_string()))?;
    if !response.is_success() {
        return Err(check_err(format!(
            "discovery page {page_url} returned HTTP {}",
            response.status
        )));
    }

    let regex = Regex::new(pattern)
        .map_err(|e| check_err(format!("invalid version pattern: {e}")))?;
    let body = String::from_utf8_lossy(&response.body);
    let captures = regex.captures(&body).ok_or_else(|| {
        check_err(format!("version pattern not found on {page_url}"))
    })?;
    let token = captures
        .get(1)
        .map(|m| m.as_str().trim())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| check_err("version pattern matched but capture group 1 was empty"))?;

    let url = download_template.replace("{version}", token);
    Ok((Version::from(token), FetchLocator(url)))
}

fn probe(
    http: &dyn HttpClient,
    url: &str,
    header: &str,
) -> Result<(Version, FetchLocator), SyncError> {
    let response = http.head(url).map_err(|e| check_err(e.to_string()))?;
    if !response.is_success() {
        return Err(check_err(format!(
            "metadata probe of {url} returned HTTP {}",
            response.status
        )));
    }

    let token = response
        .header(header)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| check_err(format!("response from {url} carried no '{header}' header")))?;

    Ok((Version::from(token), FetchLocator(url.to_owned())))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
