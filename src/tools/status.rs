//! Pantry Status Tool
//!
//! Provides runtime status information about the Pantry service.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::db::{Database, DbResult};
use crate::models::{Ingredient, InventoryItem, SavedRecipe, ShoppingList, User};

/// Workflow instructions for AI assistants
pub const PANTRY_INSTRUCTIONS: &str = r#"
# Pantry Planner Instructions

## Accounts

Every pantry, saved recipe and shopping list belongs to a user.
Call `login` (or `register_user` for a new account) first and pass the
returned `user_id` to the other tools.

## Finding recipes

- `search_recipes` searches by free text, with optional `diet` and
  `intolerances` filters.
- `search_recipes_by_ingredients` finds recipes that use what is on hand.
- `get_recipe_info` returns the full ingredient list of one recipe.
- `save_recipe` keeps a recipe for later shopping.

## Units

Quantities are normalized before they are stored or summed:

| Unit given                    | Stored as      |
|-------------------------------|----------------|
| lb, pound, pounds             | ounces x16     |
| tbsp, tablespoon(s)           | teaspoons x3   |
| anything else                 | unchanged      |

oz, ounce and ounces are one unit, as are tsp, teaspoon and teaspoons.
Amounts in any of those spellings are summed together and inventory in one
spelling covers a recipe that asks for another. Different units are never
compared: 2 "cups" of flour do not cover 10 "ounces" of flour.

## Shopping

1. `create_shopping_list` with `recipe_ids` (or none to use all saved
   recipes). Listing the same recipe twice doubles its ingredients.
2. The list splits into `in_stock` and `missing`, grouped by aisle.
3. Tick items off with `mark_purchased`.
4. After shopping, call `restock_inventory` with what was bought.

## Cooking

`cook_recipe` checks the pantry against one recipe. If anything is short
nothing changes and the shortfall is returned. Otherwise the recipe's
quantities are deducted from inventory.
"#;

/// Row counts per table
#[derive(Debug, Clone, Serialize)]
pub struct RowCounts {
    pub users: i64,
    pub saved_recipes: i64,
    pub ingredients: i64,
    pub inventory_items: i64,
    pub shopping_lists: i64,
}

impl RowCounts {
    fn load(db: &Database) -> DbResult<Self> {
        db.with_conn(|conn| {
            Ok(Self {
                users: User::count(conn)?,
                saved_recipes: SavedRecipe::count(conn)?,
                ingredients: Ingredient::count(conn)?,
                inventory_items: InventoryItem::count(conn)?,
                shopping_lists: ShoppingList::count(conn)?,
            })
        })
    }
}

/// Runtime status of the Pantry service
#[derive(Debug, Clone, Serialize)]
pub struct PantryStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub row_counts: Option<RowCounts>,

    /// Process information
    pub started_at: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    started_at: DateTime<Utc>,
    database_path: PathBuf,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            started_at: Utc::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self, db: &Database) -> PantryStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let row_counts = match RowCounts::load(db) {
            Ok(counts) => Some(counts),
            Err(e) => {
                tracing::warn!("Failed to count rows: {}", e);
                None
            }
        };

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        PantryStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            row_counts,
            started_at: self.started_at,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
