//! Meal log model
//!
//! Stores analysed meals and their resolved items.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;

use crate::db::{DbError, DbResult};
use super::food::AggregateResult;
use super::nutrition::{Fat, NutrientVector};

/// A stored meal analysis
#[derive(Debug, Clone, Serialize)]
pub struct MealLog {
    pub id: i64,
    pub description: Option<String>,
    pub item_count: i64,
    pub total_grams: f64,
    pub totals: NutrientVector,
    pub items: Vec<MealLogItem>,
    pub created_at: String,
}

/// One resolved food inside a stored meal
#[derive(Debug, Clone, Serialize)]
pub struct MealLogItem {
    pub position: i64,
    pub food_name: String,
    pub serving_text: Option<String>,
    pub matched_name: String,
    pub source_url: String,
    pub grams: f64,
    pub energy_kcal: f64,
}

impl MealLogItem {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            position: row.get("position")?,
            food_name: row.get("food_name")?,
            serving_text: row.get("serving_text")?,
            matched_name: row.get("matched_name")?,
            source_url: row.get("source_url")?,
            grams: row.get("grams")?,
            energy_kcal: row.get("energy_kcal")?,
        })
    }
}

impl MealLog {
    /// Header columns only; items are loaded separately
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            description: row.get("description")?,
            item_count: row.get("item_count")?,
            total_grams: row.get("total_grams")?,
            totals: NutrientVector {
                energy_kj: row.get("energy_kj")?,
                energy_kcal: row.get("energy_kcal")?,
                carbohydrates: row.get("carbohydrates")?,
                sugar: row.get("sugar")?,
                protein: row.get("protein")?,
                fat: Fat {
                    total: row.get("fat_total")?,
                    saturated: row.get("fat_saturated")?,
                    trans: row.get("fat_trans")?,
                    monounsaturated: row.get("fat_monounsaturated")?,
                    polyunsaturated: row.get("fat_polyunsaturated")?,
                },
                cholesterol: row.get("cholesterol")?,
                fiber: row.get("fiber")?,
                sodium: row.get("sodium")?,
                potassium: row.get("potassium")?,
            },
            items: Vec::new(),
            created_at: row.get("created_at")?,
        })
    }

    /// Insert a meal and all its items in one transaction
    pub fn create(
        conn: &mut Connection,
        description: Option<&str>,
        result: &AggregateResult,
    ) -> DbResult<Self> {
        let created_at = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        let tx = conn.transaction()?;
        let t = &result.totals;

        tx.execute(
            r#"
            INSERT INTO meal_logs (
                description, item_count, total_grams,
                energy_kj, energy_kcal, carbohydrates, sugar, protein,
                fat_total, fat_saturated, fat_trans, fat_monounsaturated, fat_polyunsaturated,
                cholesterol, fiber, sodium, potassium, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)
            "#,
            params![
                description,
                result.item_count as i64,
                result.total_grams,
                t.energy_kj,
                t.energy_kcal,
                t.carbohydrates,
                t.sugar,
                t.protein,
                t.fat.total,
                t.fat.saturated,
                t.fat.trans,
                t.fat.monounsaturated,
                t.fat.polyunsaturated,
                t.cholesterol,
                t.fiber,
                t.sodium,
                t.potassium,
                created_at,
            ],
        )?;
        let id = tx.last_insert_rowid();

        for (position, item) in result.items.iter().enumerate() {
            tx.execute(
                r#"
                INSERT INTO meal_log_items (
                    meal_log_id, position, food_name, serving_text,
                    matched_name, source_url, grams, energy_kcal
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![
                    id,
                    position as i64 + 1,
                    item.food_name,
                    item.serving,
                    item.matched_name,
                    item.source_url,
                    item.grams,
                    item.nutrients.energy_kcal,
                ],
            )?;
        }

        tx.commit()?;

        Self::get(conn, id)?.ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a meal log by ID, with items in their original order
    pub fn get(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let log = conn
            .query_row("SELECT * FROM meal_logs WHERE id = ?1", [id], Self::from_row)
            .optional()?;

        match log {
            Some(mut log) => {
                log.items = Self::items(conn, id)?;
                Ok(Some(log))
            }
            None => Ok(None),
        }
    }

    /// Most recent meals first
    pub fn list_recent(conn: &Connection, limit: i64) -> DbResult<Vec<Self>> {
        let mut stmt =
            conn.prepare("SELECT * FROM meal_logs ORDER BY created_at DESC, id DESC LIMIT ?1")?;
        let logs = stmt
            .query_map([limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        logs.into_iter()
            .map(|mut log| {
                log.items = Self::items(conn, log.id)?;
                Ok(log)
            })
            .collect()
    }

    fn items(conn: &Connection, meal_log_id: i64) -> DbResult<Vec<MealLogItem>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM meal_log_items WHERE meal_log_id = ?1 ORDER BY position",
        )?;
        let items = stmt
            .query_map([meal_log_id], MealLogItem::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }
}
