//! Disambiguation and estimation oracle
//!
//! A text-completion capability constrained to a JSON shape. Its answers are
//! never trusted: every call site validates the output and has a fallback.

pub mod claude;
pub mod selector;
pub mod serving;

use async_trait::async_trait;
use thiserror::Error;

pub use claude::ClaudeOracle;
pub use selector::select_best_match;
pub use serving::resolve_serving_grams;

/// Oracle failures. Absorbed into fallbacks, never surfaced to callers.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Oracle unavailable: {0}")]
    Unavailable(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Oracle API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Invalid oracle output: {0}")]
    InvalidOutput(String),
}

/// One structured-output request
#[derive(Debug, Clone)]
pub struct OracleRequest {
    pub system: String,
    pub prompt: String,
    /// Name of the output shape, e.g. "select_food_item"
    pub tool_name: &'static str,
    /// JSON schema the answer must satisfy
    pub schema: serde_json::Value,
}

/// Text completion constrained to a JSON schema
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Return the answer as raw JSON text
    async fn complete(&self, request: &OracleRequest) -> Result<String, OracleError>;
}

/// Used when no API key is configured; every decision takes its fallback
pub struct UnavailableOracle;

#[async_trait]
impl Oracle for UnavailableOracle {
    async fn complete(&self, _request: &OracleRequest) -> Result<String, OracleError> {
        Err(OracleError::Unavailable("no API key configured".to_string()))
    }
}
