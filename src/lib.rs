//! Prato Library
//!
//! Nutrition analysis of free-text meals: search a Brazilian nutrition table,
//! pick the right food, estimate serving weights and sum the nutrients.

pub mod analysis;
pub mod build_info;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod oracle;
pub mod scrape;
pub mod tools;
