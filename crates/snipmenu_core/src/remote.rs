//! Remote template source fetching.
//!
//! A broken remote source must degrade to "no default templates" on the
//! background path, never block a menu rebuild; only the interactive
//! validation path surfaces fetch errors to the caller.

use crate::error::AppError;
use crate::models::template::Template;
use tracing::warn;

/// Decode a remote payload into template records.
///
/// # Returns
/// The decoded records when the body is a JSON array of record-shaped
/// objects (unknown fields are ignored, missing fields default).
///
/// # Errors
/// Returns [`AppError::RemoteSource`] for any other payload shape.
pub fn parse_remote_payload(body: &str) -> Result<Vec<Template>, AppError> {
    serde_json::from_str::<Vec<Template>>(body).map_err(|err| {
        AppError::RemoteSource(format!("expected a JSON array of templates: {}", err))
    })
}

/// Fetcher for the user-configured remote template source.
pub struct RemoteFetcher {
    client: reqwest::blocking::Client,
}

impl RemoteFetcher {
    /// Build a fetcher with the default blocking client.
    ///
    /// No request timeout is layered on top of the client's own; an
    /// unresponsive server stalls only the reload cycle that issued the
    /// fetch.
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Fetch and decode the remote template list.
    ///
    /// # Returns
    /// The records in fetch order, duplicates included (de-duplication is the
    /// merge's job).
    ///
    /// # Errors
    /// Returns [`AppError::RemoteSource`] on transport failure, a non-success
    /// status, or a payload that is not a JSON array of records.
    pub fn fetch(&self, url: &str) -> Result<Vec<Template>, AppError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| AppError::RemoteSource(format!("request failed: {}", err)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::RemoteSource(format!(
                "unexpected status {}",
                status
            )));
        }

        let body = response
            .text()
            .map_err(|err| AppError::RemoteSource(format!("failed to read body: {}", err)))?;
        parse_remote_payload(&body)
    }

    /// Background-path fetch: any failure degrades to an empty list.
    ///
    /// An empty or unset URL short-circuits without issuing a request.
    pub fn fetch_or_default(&self, url: &str) -> Vec<Template> {
        if url.trim().is_empty() {
            return Vec::new();
        }
        match self.fetch(url) {
            Ok(templates) => templates,
            Err(err) => {
                warn!("remote template fetch degraded to empty: {}", err);
                Vec::new()
            }
        }
    }
}

impl Default for RemoteFetcher {
    fn default() -> Self {
        Self::new()
    }
}
