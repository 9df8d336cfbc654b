//! Runtime configuration
//!
//! Everything comes from environment variables, with defaults that work for a
//! local checkout.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::analysis::{AnalysisResult, Analyzer, HttpFoodSource, DEFAULT_SOURCE_URL};
use crate::oracle::{ClaudeOracle, Oracle, UnavailableOracle};

/// Model used when PRATO_MODEL is unset
pub const DEFAULT_MODEL: &str = "claude-3-5-haiku-latest";
const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Runtime settings, read once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub api_key: Option<String>,
    pub model: String,
    pub source_url: String,
    pub http_timeout: Duration,
}

/// `<project>/data/prato.db`, walking up out of target/{debug,release}
fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(parent) = path.parent() {
            if let Some(grandparent) = parent.parent() {
                path = grandparent.to_path_buf();
            }
        }
    }

    path.push("data");
    path.push("prato.db");
    path
}

impl Config {
    /// Read from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            database_path: get("PRATO_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(default_database_path),
            api_key: get("ANTHROPIC_API_KEY"),
            model: get("PRATO_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            source_url: get("PRATO_SOURCE_URL").unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string()),
            http_timeout: Duration::from_secs(
                get("PRATO_HTTP_TIMEOUT_SECS")
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        }
    }

    /// Oracle for this configuration. Without an API key (or if the client
    /// can't be built) every oracle decision takes its fallback.
    pub fn oracle(&self) -> Arc<dyn Oracle> {
        let Some(key) = &self.api_key else {
            tracing::warn!("ANTHROPIC_API_KEY not set; food selection and serving estimates use fallbacks");
            return Arc::new(UnavailableOracle);
        };

        match ClaudeOracle::new(key.clone(), self.model.clone(), self.http_timeout) {
            Ok(oracle) => Arc::new(oracle),
            Err(e) => {
                tracing::warn!("Oracle client unavailable: {}", e);
                Arc::new(UnavailableOracle)
            }
        }
    }

    /// Live analyzer: HTTP food source plus the configured oracle
    pub fn analyzer(&self) -> AnalysisResult<Analyzer> {
        let source = HttpFoodSource::new(self.source_url.clone(), self.http_timeout)?;
        Ok(Analyzer::new(Arc::new(source), self.oracle()))
    }
}
