//! Prato Tools module
//!
//! MCP tool implementations.

pub mod analysis;
pub mod meal_logs;
pub mod status;
