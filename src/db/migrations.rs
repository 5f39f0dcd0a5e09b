//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
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
        tracing::info!("Applied schema migration v1");
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- USERS
        -- ============================================
        CREATE TABLE users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,         -- argon2 PHC string
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- SAVED RECIPES
        -- Recipes a user picked from search; recipe_id is the Spoonacular id
        -- ============================================
        CREATE TABLE saved_recipes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            recipe_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            image TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),

            UNIQUE(user_id, recipe_id)
        );

        CREATE INDEX idx_saved_recipes_user ON saved_recipes(user_id);

        -- ============================================
        -- INGREDIENTS
        -- Catalog keyed by the Spoonacular ingredient id
        -- ============================================
        CREATE TABLE ingredients (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            aisle TEXT NOT NULL DEFAULT '',
            base_unit TEXT,                      -- "ounces", "teaspoons", or NULL if unknown
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_ingredients_name ON ingredients(name);

        -- ============================================
        -- INVENTORY
        -- What a user has on hand; quantity is in base unit
        -- ============================================
        CREATE TABLE inventory_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            ingredient_id INTEGER NOT NULL REFERENCES ingredients(id) ON DELETE RESTRICT,
            quantity REAL NOT NULL CHECK(quantity >= 0),
            unit TEXT NOT NULL,
            notes TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),

            UNIQUE(user_id, ingredient_id)
        );

        CREATE INDEX idx_inventory_user ON inventory_items(user_id);

        -- ============================================
        -- SHOPPING LISTS
        -- ============================================
        CREATE TABLE shopping_lists (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            notes TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_shopping_lists_user ON shopping_lists(user_id);

        -- Recipes a list was generated from, in input order (duplicates kept)
        CREATE TABLE shopping_list_recipes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            shopping_list_id INTEGER NOT NULL REFERENCES shopping_lists(id) ON DELETE CASCADE,
            recipe_id INTEGER NOT NULL,
            position INTEGER NOT NULL
        );

        CREATE INDEX idx_shopping_list_recipes_list ON shopping_list_recipes(shopping_list_id);

        CREATE TABLE shopping_list_ingredients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            shopping_list_id INTEGER NOT NULL REFERENCES shopping_lists(id) ON DELETE CASCADE,
            ingredient_id INTEGER NOT NULL REFERENCES ingredients(id) ON DELETE RESTRICT,
            quantity_needed REAL NOT NULL,
            quantity_on_hand REAL NOT NULL DEFAULT 0,
            quantity_to_buy REAL NOT NULL DEFAULT 0,
            unit TEXT NOT NULL,
            status TEXT NOT NULL CHECK(status IN ('in_stock', 'missing')),
            unit_conflict INTEGER NOT NULL DEFAULT 0,   -- boolean
            is_purchased INTEGER NOT NULL DEFAULT 0,    -- boolean

            UNIQUE(shopping_list_id, ingredient_id)
        );

        CREATE INDEX idx_shopping_list_ingredients_list ON shopping_list_ingredients(shopping_list_id);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}
