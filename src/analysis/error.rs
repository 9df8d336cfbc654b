//! Analysis error types

use thiserror::Error;

/// Failures that abort a food resolution (and with it, a whole meal)
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("No foods found for '{query}'")]
    NotFound { query: String },

    #[error("Fetch of {url} failed with status {status}")]
    Fetch { url: String, status: u16 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid source URL: {0}")]
    InvalidUrl(String),
}

/// Result type for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;
