//! Meal Analysis Tools
//!
//! Resolve foods and meals, optionally saving meals to the log.

use serde::Serialize;

use crate::analysis::Analyzer;
use crate::db::Database;
use crate::models::{AggregateResult, MealItemRequest, MealLog, ResolvedFoodItem};

/// Upper bound on items per meal request
pub const MAX_MEAL_ITEMS: usize = 20;

/// Response for analyze_meal
#[derive(Debug, Serialize)]
pub struct AnalyzeMealResponse {
    #[serde(flatten)]
    pub result: AggregateResult,
    /// Set when the meal was saved
    pub meal_log_id: Option<i64>,
}

fn validate_food_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("food_name cannot be empty".to_string());
    }
    Ok(())
}

/// Resolve one food to its serving
pub async fn analyze_food(
    analyzer: &Analyzer,
    food_name: &str,
    serving: Option<&str>,
) -> Result<ResolvedFoodItem, String> {
    validate_food_name(food_name)?;
    analyzer
        .resolve_food(food_name.trim(), serving)
        .await
        .map_err(|e| format!("Failed to analyze '{}': {}", food_name, e))
}

/// Resolve and sum a whole meal; save it when `save` is set
pub async fn analyze_meal(
    analyzer: &Analyzer,
    db: &Database,
    items: Vec<MealItemRequest>,
    description: Option<&str>,
    save: bool,
) -> Result<AnalyzeMealResponse, String> {
    if items.len() > MAX_MEAL_ITEMS {
        return Err(format!("A meal can have at most {} items", MAX_MEAL_ITEMS));
    }
    let items = items
        .into_iter()
        .map(|item| {
            validate_food_name(&item.food_name)?;
            Ok(MealItemRequest {
                food_name: item.food_name.trim().to_string(),
                serving: item.serving,
            })
        })
        .collect::<Result<Vec<_>, String>>()?;

    let result = analyzer
        .aggregate(&items)
        .await
        .map_err(|e| format!("Failed to analyze meal: {}", e))?;

    let meal_log_id = if save {
        let log = db
            .with_conn_mut(|conn| MealLog::create(conn, description, &result))
            .map_err(|e| format!("Failed to save meal: {}", e))?;
        Some(log.id)
    } else {
        None
    };

    Ok(AnalyzeMealResponse {
        result,
        meal_log_id,
    })
}
