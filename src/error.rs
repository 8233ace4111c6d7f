//! Error types for page loading and fetching.
//!
//! Missing SEO data is never an error; these cover the cases where no page data could be
//! produced at all.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    /// Invalid or malformed URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Page file could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Page data file is not a valid snapshot
    #[error("Invalid page data in {}: {message}", path.display())]
    InvalidData { path: PathBuf, message: String },

    /// Network request failed
    #[error("Network error: {0}")]
    Network(String),

    /// Check id not present in the catalog
    #[error("Unknown check: {0}")]
    UnknownCheck(String),
}

impl AuditError {
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }
}
