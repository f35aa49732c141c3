//! UniProtKB REST API client.
//!
//! This module contains the core of the crate: [`UniProtClient`], a
//! paginated, retrying HTTP client for the UniProtKB search endpoint, plus
//! the [`SearchPages`] cursor iterator and the [`UniProtError`] taxonomy.

mod client;

pub use client::{SearchPages, UniProtClient, UNIPROT_BASE_URL};

/// Errors that can occur when talking to the UniProt REST API
#[derive(Debug, thiserror::Error)]
pub enum UniProtError {
    /// Network or transport error (timeout, connection refused, DNS)
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status from the API
    ///
    /// Carries enough context (status, URL, body) to diagnose a malformed
    /// query without replaying the request.
    #[error("UniProt API returned status {status} for {url}: {body}")]
    Api {
        status: u16,
        url: String,
        body: String,
    },

    /// Response body could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A continuation link was signaled but its cursor could not be extracted
    #[error("Malformed continuation link: {0}")]
    MalformedContinuation(String),
}

impl From<reqwest::Error> for UniProtError {
    fn from(err: reqwest::Error) -> Self {
        UniProtError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for UniProtError {
    fn from(err: serde_json::Error) -> Self {
        UniProtError::Parse(format!("JSON: {}", err))
    }
}
