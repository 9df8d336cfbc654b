//! Meal Log Tools
//!
//! Read back saved meal analyses.

use serde::Serialize;

use crate::db::Database;
use crate::models::MealLog;

/// Response for list_meal_logs
#[derive(Debug, Serialize)]
pub struct ListMealLogsResponse {
    pub meals: Vec<MealLog>,
    pub total: usize,
}

/// Get one saved meal
pub fn get_meal_log(db: &Database, id: i64) -> Result<Option<MealLog>, String> {
    db.with_conn(|conn| MealLog::get(conn, id))
        .map_err(|e| format!("Database error: {}", e))
}

/// Most recent saved meals
pub fn list_meal_logs(db: &Database, limit: i64) -> Result<ListMealLogsResponse, String> {
    let limit = limit.clamp(1, 100);
    let meals = db
        .with_conn(|conn| MealLog::list_recent(conn, limit))
        .map_err(|e| format!("Database error: {}", e))?;

    Ok(ListMealLogsResponse {
        total: meals.len(),
        meals,
    })
}
