//! Inventory Tools
//!
//! What a user has on hand. Every quantity is converted to its base unit
//! before it is stored.

use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::models::{Ingredient, InventoryItem, InventoryItemDetail};
use crate::tools::users::require_user;
use crate::units::{base_unit_for, commensurable, convert_to_base_unit};

/// One ingredient amount supplied by the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryInput {
    pub ingredient_id: i64,
    pub name: String,
    #[serde(default)]
    pub aisle: Option<String>,
    pub quantity: f64,
    pub unit: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Stored stock after a change
#[derive(Debug, Serialize)]
pub struct InventoryChange {
    pub ingredient_id: i64,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

/// Response for restock_inventory
#[derive(Debug, Serialize)]
pub struct RestockResponse {
    pub user_id: i64,
    pub items: Vec<InventoryChange>,
    pub total: usize,
}

/// Response for list_inventory
#[derive(Debug, Serialize)]
pub struct ListInventoryResponse {
    pub user_id: i64,
    pub items: Vec<InventoryItemDetail>,
    pub total: usize,
}

/// Response for remove_inventory_item
#[derive(Debug, Serialize)]
pub struct RemoveInventoryItemResponse {
    pub success: bool,
    pub ingredient_id: i64,
}

fn validate(input: &InventoryInput) -> Result<(), String> {
    if input.name.trim().is_empty() {
        return Err("Ingredient name cannot be empty".to_string());
    }
    if !input.quantity.is_finite() || input.quantity < 0.0 {
        return Err("quantity must be a non-negative number".to_string());
    }
    if input.unit.trim().is_empty() {
        return Err("unit cannot be empty".to_string());
    }
    Ok(())
}

fn catalog(conn: &rusqlite::Connection, input: &InventoryInput) -> Result<Ingredient, String> {
    Ingredient::upsert(
        conn,
        input.ingredient_id,
        input.name.trim(),
        input.aisle.as_deref().unwrap_or("").trim(),
        base_unit_for(&input.unit),
    )
    .map_err(|e| format!("Failed to record ingredient: {}", e))
}

/// Set the stock of an ingredient, replacing any previous amount
pub fn set_inventory_item(db: &Database, user_id: i64, input: InventoryInput) -> Result<InventoryChange, String> {
    validate(&input)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    require_user(&conn, user_id)?;

    let ingredient = catalog(&conn, &input)?;
    let (quantity, unit) = convert_to_base_unit(input.quantity, &input.unit);

    let item = InventoryItem::set(&conn, user_id, ingredient.id, quantity, &unit, input.notes.as_deref())
        .map_err(|e| format!("Failed to set inventory: {}", e))?;

    Ok(InventoryChange {
        ingredient_id: item.ingredient_id,
        name: ingredient.name,
        quantity: item.quantity,
        unit: item.unit,
    })
}

/// Add purchased amounts to inventory in one transaction
///
/// An amount in the unit already on hand (any spelling of it, e.g. `oz`
/// and `ounces`) is added to it and keeps the stored spelling. An amount in a
/// different unit replaces the stored stock, since the two cannot be summed.
pub fn restock_inventory(db: &Database, user_id: i64, items: Vec<InventoryInput>) -> Result<RestockResponse, String> {
    if items.is_empty() {
        return Err("No items to restock".to_string());
    }
    for item in &items {
        validate(item)?;
    }

    let mut conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    require_user(&conn, user_id)?;

    let tx = conn
        .transaction()
        .map_err(|e| format!("Database error: {}", e))?;

    let mut changes = Vec::with_capacity(items.len());
    for input in &items {
        let ingredient = catalog(&tx, input)?;
        let (amount, unit) = convert_to_base_unit(input.quantity, &input.unit);

        let existing = InventoryItem::get(&tx, user_id, ingredient.id)
            .map_err(|e| format!("Failed to read inventory: {}", e))?;

        let (quantity, unit) = match existing {
            Some(current) if commensurable(&current.unit, &unit) => {
                (current.quantity + amount, current.unit)
            }
            Some(current) => {
                tracing::warn!(
                    ingredient_id = ingredient.id,
                    stored_unit = %current.unit,
                    restock_unit = %unit,
                    "Restock unit differs from stored unit; replacing stock"
                );
                (amount, unit)
            }
            None => (amount, unit),
        };

        let item = InventoryItem::set(&tx, user_id, ingredient.id, quantity, &unit, input.notes.as_deref())
            .map_err(|e| format!("Failed to restock inventory: {}", e))?;

        changes.push(InventoryChange {
            ingredient_id: item.ingredient_id,
            name: ingredient.name,
            quantity: item.quantity,
            unit: item.unit,
        });
    }

    tx.commit().map_err(|e| format!("Database error: {}", e))?;

    tracing::info!(user_id, items = changes.len(), "Restocked inventory");
    let total = changes.len();
    Ok(RestockResponse {
        user_id,
        items: changes,
        total,
    })
}

/// A user's inventory grouped by aisle
pub fn list_inventory(db: &Database, user_id: i64) -> Result<ListInventoryResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    require_user(&conn, user_id)?;

    let items = InventoryItem::list_details(&conn, user_id)
        .map_err(|e| format!("Failed to list inventory: {}", e))?;
    let total = items.len();

    Ok(ListInventoryResponse { user_id, items, total })
}

/// Remove an ingredient from a user's inventory
pub fn remove_inventory_item(db: &Database, user_id: i64, ingredient_id: i64) -> Result<RemoveInventoryItemResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let removed = InventoryItem::delete(&conn, user_id, ingredient_id)
        .map_err(|e| format!("Failed to remove inventory item: {}", e))?;
    if !removed {
        return Err(format!("Ingredient {} is not in inventory", ingredient_id));
    }

    Ok(RemoveInventoryItemResponse {
        success: true,
        ingredient_id,
    })
}
