//! Database module
//!
//! SQLite connection pool and migrations for the meal log.

pub mod connection;
pub mod migrations;

pub use connection::{Database, DbError, DbResult};
