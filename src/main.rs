//! Prato
//!
//! An MCP server for meal nutrition analysis.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use prato::build_info;
use prato::config::Config;
use prato::db;
use prato::mcp::PratoService;
use prato::tools::status::StatusTracker;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging goes to stderr to keep stdout for MCP
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("prato=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let config = Config::from_env();
    eprintln!("Database path: {}", config.database_path.display());

    let database = db::Database::open(&config.database_path)?;
    eprintln!("Database schema version: {}", database.schema_version());

    let analyzer = config.analyzer()?;
    let oracle_model = config.api_key.as_ref().map(|_| config.model.clone());
    tracing::info!(source = %config.source_url, model = ?oracle_model, "Analyzer ready");

    let tracker = StatusTracker::new(database.clone(), oracle_model, config.source_url.clone());
    let service = PratoService::new(tracker, database, analyzer);

    let transport = (stdin(), stdout());
    let server = service.serve(transport).await?;
    server.waiting().await?;

    Ok(())
}
