//! Meal analysis pipeline
//!
//! Resolves foods against the data source and aggregates meals.

pub mod error;
pub mod resolver;
pub mod source;

pub use error::{AnalysisError, AnalysisResult};
pub use resolver::Analyzer;
pub use source::{FoodSource, HttpFoodSource, DEFAULT_SOURCE_URL};
