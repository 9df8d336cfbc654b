//! Build stamp
//!
//! build.rs embeds a build counter and compile time; `prato_status` and the
//! startup banner report them next to the crate version.

use serde::Serialize;

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version plus the stamp from build.rs. Missing or garbled stamps read as
/// build 0, compiled "unknown".
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
}

impl BuildInfo {
    /// Stamp of the running binary
    pub fn current() -> Self {
        Self::from_stamp(
            option_env!("PRATO_BUILD_NUMBER"),
            option_env!("PRATO_BUILD_TIMESTAMP"),
        )
    }

    fn from_stamp(number: Option<&'static str>, timestamp: Option<&'static str>) -> Self {
        Self {
            version: VERSION,
            build_number: number.and_then(|n| n.trim().parse().ok()).unwrap_or(0),
            build_timestamp: timestamp.filter(|t| !t.is_empty()).unwrap_or("unknown"),
        }
    }

    /// One line for logs and the banner, e.g. "v0.1.0 (build 42, 2026-10-19T10:00:00Z)"
    pub fn describe(&self) -> String {
        format!(
            "v{} (build {}, {})",
            self.version, self.build_number, self.build_timestamp
        )
    }
}

/// Print the startup banner to stderr (stdout belongs to MCP)
pub fn print_startup_banner() {
    eprintln!("===============================================");
    eprintln!("  Prato - meal nutrition analysis");
    eprintln!("  {}", BuildInfo::current().describe());
    eprintln!("===============================================");
}
