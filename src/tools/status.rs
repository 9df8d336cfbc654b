//! Prato Status Tool
//!
//! Runtime status of the service.

use serde::Serialize;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::db::Database;

/// How to use the analysis tools, for AI assistants
pub const ANALYSIS_INSTRUCTIONS: &str = r#"
# Prato Meal Analysis Instructions

1. Split the user's meal into foods. Keep each food name short and in Portuguese
   as it would appear in a Brazilian nutrition table ("arroz branco", "feijão carioca").
2. Keep the user's own serving words in `serving` ("1 prato cheio", "2 colheres de sopa",
   "150g"). Leave it empty when the user gave none; 100g is assumed.
3. Call `analyze_meal` with all foods at once. Pass `save: true` to keep the meal in the log.
4. Report totals from `totals` and per-food values from `items`.

A value of 0 may mean the nutrient is absent or that the source page didn't list it.
If one food can't be found the whole call fails; retry without that food or rephrase it.
"#;

/// Runtime status of the service
#[derive(Debug, Clone, Serialize)]
pub struct PratoStatus {
    pub build: BuildInfo,

    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub schema_version: i32,
    pub oracle_model: Option<String>,
    pub source_url: String,

    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database: Database,
    oracle_model: Option<String>,
    source_url: String,
}

impl StatusTracker {
    /// Start the uptime clock
    pub fn new(database: Database, oracle_model: Option<String>, source_url: String) -> Self {
        Self {
            start_time: Instant::now(),
            database,
            oracle_model,
            source_url,
        }
    }

    /// Snapshot of build, database, oracle and process state
    pub fn get_status(&self) -> PratoStatus {
        let database_size_bytes = std::fs::metadata(self.database.path())
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        PratoStatus {
            build: BuildInfo::current(),
            database_path: self.database.path().display().to_string(),
            database_size_bytes,
            schema_version: self.database.schema_version(),
            oracle_model: self.oracle_model.clone(),
            source_url: self.source_url.clone(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
