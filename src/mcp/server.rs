//! Prato MCP Server Implementation
//!
//! Exposes meal analysis and the meal log as MCP tools.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::analysis::Analyzer;
use crate::db::Database;
use crate::models::MealItemRequest;
use crate::tools::analysis;
use crate::tools::meal_logs;
use crate::tools::status::StatusTracker;

/// Prato MCP Service
#[derive(Clone)]
pub struct PratoService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    analyzer: Analyzer,
    tool_router: ToolRouter<PratoService>,
}

impl PratoService {
    /// Build the service and its tool router
    pub fn new(status_tracker: StatusTracker, database: Database, analyzer: Analyzer) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(status_tracker)),
            database,
            analyzer,
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AnalyzeFoodParams {
    /// Food name in Portuguese, e.g. "arroz branco"
    pub food_name: String,
    /// Free-text serving, e.g. "2 colheres de sopa" or "150g". Defaults to 100g.
    pub serving: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MealItemParam {
    pub food_name: String,
    pub serving: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AnalyzeMealParams {
    pub items: Vec<MealItemParam>,
    pub description: Option<String>,
    /// Save the analyzed meal to the meal log
    #[serde(default)]
    pub save: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetMealLogParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListMealLogsParams {
    #[serde(default = "default_list_limit")]
    pub limit: i64,
}

fn default_list_limit() -> i64 { 20 }

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl PratoService {
    // --- Status ---

    #[tool(description = "Get the current status of the Prato service including build info, database status, oracle model, and process information")]
    async fn prato_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        to_json(&tracker.get_status())
    }

    #[tool(description = "Get step-by-step instructions for analyzing meals. Call this before the first analyze_meal of a session.")]
    fn analysis_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::ANALYSIS_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(ANALYSIS_INSTRUCTIONS)]))
    }

    // --- Analysis ---

    #[tool(description = "Look up one food on the Brazilian nutrition table and return its nutrients for the given serving (100g when omitted)")]
    async fn analyze_food(&self, Parameters(p): Parameters<AnalyzeFoodParams>) -> Result<CallToolResult, McpError> {
        let result = analysis::analyze_food(&self.analyzer, &p.food_name, p.serving.as_deref())
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Analyze a whole meal: resolve every food and serving, then return per-item nutrients and meal totals. Fails if any food can't be found. Set save=true to store the meal in the log.")]
    async fn analyze_meal(&self, Parameters(p): Parameters<AnalyzeMealParams>) -> Result<CallToolResult, McpError> {
        let items = p
            .items
            .into_iter()
            .map(|i| MealItemRequest {
                food_name: i.food_name,
                serving: i.serving,
            })
            .collect();
        let result = analysis::analyze_meal(&self.analyzer, &self.database, items, p.description.as_deref(), p.save)
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Meal Log ---

    #[tool(description = "Get a saved meal analysis by ID with its items and totals")]
    fn get_meal_log(&self, Parameters(p): Parameters<GetMealLogParams>) -> Result<CallToolResult, McpError> {
        let result = meal_logs::get_meal_log(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(log) => to_json(&log),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "Meal log not found", "id": {}}}"#,
                p.id
            ))])),
        }
    }

    #[tool(description = "List the most recently saved meal analyses, newest first")]
    fn list_meal_logs(&self, Parameters(p): Parameters<ListMealLogsParams>) -> Result<CallToolResult, McpError> {
        let result = meal_logs::list_meal_logs(&self.database, p.limit).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for PratoService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "prato".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Prato Meal Analysis".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Prato - nutrition analysis of meals described in free text, using the FatSecret Brasil tables. \
                 Call analysis_instructions first. \
                 Analysis: analyze_food (one food), analyze_meal (all foods of a meal, optional save). \
                 Meal log: get_meal_log, list_meal_logs. \
                 Status: prato_status."
                    .into(),
            ),
        }
    }
}
