//! Pantry Tools module
//!
//! MCP tool implementations for the Pantry Planner.

pub mod inventory;
pub mod recipes;
pub mod shopping_lists;
pub mod status;
pub mod users;

/// Pooled in-memory database with the schema applied
#[cfg(test)]
pub(crate) fn test_database() -> crate::db::Database {
    let db = crate::db::Database::open_in_memory().unwrap();
    db.with_conn(|conn| crate::db::migrations::run_migrations(conn))
        .unwrap();
    db
}
