//! HTTP client seam.
//!
//! The pipeline talks to upstream publishers through [`HttpClient`] so that
//! every stage is testable with an in-memory fake. [`UreqClient`] is the
//! production implementation.
//!
//! Any HTTP response — success or not — is `Ok`; the caller decides what a
//! non-200 status means for its stage. Only transport-level failures (DNS,
//! refused connection, timeout) are errors.

use std::collections::HashMap;
use std::io::Read;
use std::time::Duration;

use thiserror::Error;

/// Transport-level HTTP failure.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("transport error for {url}: {reason}")]
    Transport { url: String, reason: String },
}

/// A fully buffered HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    /// Header names lowercased on insertion.
    headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        let headers = headers
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v))
            .collect();
        Self {
            status,
            headers,
            body,
        }
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking HTTP operations used by the pipeline.
pub trait HttpClient {
    fn get(&self, url: &str) -> Result<HttpResponse, HttpError>;
    fn head(&self, url: &str) -> Result<HttpResponse, HttpError>;
}

// ---------------------------------------------------------------------------
// ureq implementation
// ---------------------------------------------------------------------------

/// Production client backed by a shared [`ureq::Agent`].
pub struct UreqClient {
    agent: ureq::Agent,
}

impl UreqClient {
    /// Agent with 30 s connect/read timeouts. A hung upstream should fail a
    /// single dataset, not wedge the whole run.
    pub fn new() -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(30))
            .timeout_read(Duration::from_secs(30))
            .build();
        Self { agent }
    }

    fn dispatch(&self, request: ureq::Request, url: &str) -> Result<HttpResponse, HttpError> {
        let response = match request.call() {
            Ok(response) => response,
            // 4xx/5xx carry a response; surface it as data, not an error.
            Err(ureq::Error::Status(_, response)) => response,
            Err(err) => {
                return Err(HttpError::Transport {
                    url: url.to_owned(),
                    reason: err.to_string(),
                })
            }
        };

        let status = response.status();
        let mut headers = HashMap::new();
        for name in response.headers_names() {
            if let Some(value) = response.header(&name) {
                headers.insert(name.clone(), value.to_owned());
            }
        }

        let mut body = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut body)
            .map_err(|e| HttpError::Transport {
                url: url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(HttpResponse::new(status, headers, body))
    }
}

impl Default for UreqClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for UreqClient {
    fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        self.dispatch(self.agent.get(url), url)
    }

    fn head(&self, url: &str) -> Result<HttpResponse, HttpError> {
        self.dispatch(self.agent.head(url), url)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
