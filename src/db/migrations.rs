//! Database migrations
//!
//! Schema creation for the meal log.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    tracing::debug!(version = SCHEMA_VERSION, "Meal log schema ready");
    Ok(())
}

/// Highest applied migration, 0 for a fresh database
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Migration v1: meal logs and their items
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- MEAL LOGS
        -- One analysed meal with rounded totals
        -- ============================================
        CREATE TABLE meal_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            description TEXT,
            item_count INTEGER NOT NULL,
            total_grams REAL NOT NULL DEFAULT 0,

            energy_kj REAL NOT NULL DEFAULT 0,
            energy_kcal REAL NOT NULL DEFAULT 0,
            carbohydrates REAL NOT NULL DEFAULT 0,  -- grams
            sugar REAL NOT NULL DEFAULT 0,          -- grams
            protein REAL NOT NULL DEFAULT 0,        -- grams
            fat_total REAL NOT NULL DEFAULT 0,      -- grams
            fat_saturated REAL NOT NULL DEFAULT 0,
            fat_trans REAL NOT NULL DEFAULT 0,
            fat_monounsaturated REAL NOT NULL DEFAULT 0,
            fat_polyunsaturated REAL NOT NULL DEFAULT 0,
            cholesterol REAL NOT NULL DEFAULT 0,    -- milligrams
            fiber REAL NOT NULL DEFAULT 0,          -- grams
            sodium REAL NOT NULL DEFAULT 0,         -- milligrams
            potassium REAL NOT NULL DEFAULT 0,      -- milligrams

            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_meal_logs_created_at ON meal_logs(created_at);

        -- ============================================
        -- MEAL LOG ITEMS
        -- Resolved foods, in request order
        -- ============================================
        CREATE TABLE meal_log_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            meal_log_id INTEGER NOT NULL REFERENCES meal_logs(id) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            food_name TEXT NOT NULL,
            serving_text TEXT,
            matched_name TEXT NOT NULL,
            source_url TEXT NOT NULL,
            grams REAL NOT NULL,
            energy_kcal REAL NOT NULL DEFAULT 0,

            UNIQUE(meal_log_id, position)
        );
        "#,
    )?;

    Ok(())
}
