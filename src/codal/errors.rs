//! Codal-specific error types

use thiserror::Error;

/// Hard errors that abort a run.
///
/// Soft failures (missing links, server error pages) are not errors; they are
/// recorded as [`crate::models::FailureRecord`] values instead.
#[derive(Error, Debug)]
pub enum CodalError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse search response from {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to list directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Invalid HTTP header: {0}")]
    InvalidHeader(String),
}
