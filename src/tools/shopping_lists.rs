//! Shopping List Tools
//!
//! Builds shopping lists from recipes and the user's inventory, and checks
//! the pantry before cooking.

use serde::Serialize;

use crate::db::{Database, DbError};
use crate::models::{InventoryItem, ItemStatus, SavedRecipe, ShoppingList, ShoppingListItem, ShoppingListSummary};
use crate::shopping::{aggregate_ingredients, plan_shopping, PlanLine, RecipeSource};
use crate::tools::users::require_user;

/// A shopping list with its recipes and items
#[derive(Debug, Serialize)]
pub struct ShoppingListDetail {
    pub id: i64,
    pub user_id: i64,
    pub notes: Option<String>,
    pub created_at: String,
    pub recipe_ids: Vec<i64>,
    pub in_stock: Vec<ShoppingListItem>,
    pub missing: Vec<ShoppingListItem>,
    pub unit_conflicts: usize,
}

/// Response for list_shopping_lists
#[derive(Debug, Serialize)]
pub struct ListShoppingListsResponse {
    pub user_id: i64,
    pub lists: Vec<ShoppingListSummary>,
    pub total: usize,
}

/// Response for mark_purchased
#[derive(Debug, Serialize)]
pub struct MarkPurchasedResponse {
    pub list_id: i64,
    pub ingredient_id: i64,
    pub is_purchased: bool,
}

/// Response for delete_shopping_list
#[derive(Debug, Serialize)]
pub struct DeleteShoppingListResponse {
    pub success: bool,
    pub deleted_id: i64,
}

/// Response for cook_recipe
#[derive(Debug, Serialize)]
pub struct CookRecipeResponse {
    pub result: bool,
    pub recipe_id: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<PlanLine>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deducted: Vec<PlanLine>,
}

fn load_detail(conn: &rusqlite::Connection, list: ShoppingList) -> Result<ShoppingListDetail, String> {
    let recipe_ids = ShoppingList::get_recipe_ids(conn, list.id)
        .map_err(|e| format!("Failed to load list recipes: {}", e))?;
    let items = ShoppingList::get_items(conn, list.id)
        .map_err(|e| format!("Failed to load list items: {}", e))?;

    let unit_conflicts = items.iter().filter(|i| i.unit_conflict).count();
    let (in_stock, missing): (Vec<_>, Vec<_>) = items
        .into_iter()
        .partition(|i| i.status == ItemStatus::InStock);

    Ok(ShoppingListDetail {
        id: list.id,
        user_id: list.user_id,
        notes: list.notes,
        created_at: list.created_at,
        recipe_ids,
        in_stock,
        missing,
        unit_conflicts,
    })
}

/// Build and store a shopping list
///
/// With no recipe ids the user's saved recipes are used. A recipe listed
/// twice contributes its ingredients twice.
pub fn create_shopping_list<S>(
    db: &Database,
    source: &S,
    user_id: i64,
    recipe_ids: Option<Vec<i64>>,
    notes: Option<String>,
) -> Result<ShoppingListDetail, String>
where
    S: RecipeSource + ?Sized,
{
    let recipe_ids = {
        let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
        require_user(&conn, user_id)?;

        match recipe_ids {
            Some(ids) => ids,
            None => SavedRecipe::list_for_user(&conn, user_id)
                .map_err(|e| format!("Failed to list saved recipes: {}", e))?
                .into_iter()
                .map(|r| r.recipe_id)
                .collect(),
        }
    };

    if recipe_ids.is_empty() {
        return Err("No recipes to build a shopping list from".to_string());
    }

    let aggregation = aggregate_ingredients(source, &recipe_ids).map_err(|e| e.to_string())?;

    let list = db
        .with_conn_mut(|conn| {
            let stock = InventoryItem::stock_levels(conn, user_id)?;
            let plan = plan_shopping(&aggregation, &stock);
            ShoppingList::create_from_plan(conn, user_id, &recipe_ids, &plan, notes.as_deref())
        })
        .map_err(|e| format!("Failed to create shopping list: {}", e))?;

    tracing::info!(
        list_id = list.id,
        user_id,
        recipes = recipe_ids.len(),
        ingredients = aggregation.len(),
        "Created shopping list"
    );

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    load_detail(&conn, list)
}

/// Get a shopping list with its items
pub fn get_shopping_list(db: &Database, list_id: i64) -> Result<Option<ShoppingListDetail>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let list = ShoppingList::get_by_id(&conn, list_id)
        .map_err(|e| format!("Failed to get shopping list: {}", e))?;

    match list {
        Some(list) => load_detail(&conn, list).map(Some),
        None => Ok(None),
    }
}

/// A user's shopping lists, newest first
pub fn list_shopping_lists(db: &Database, user_id: i64) -> Result<ListShoppingListsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    require_user(&conn, user_id)?;

    let lists = ShoppingList::list_for_user(&conn, user_id)
        .map_err(|e| format!("Failed to list shopping lists: {}", e))?;
    let total = lists.len();

    Ok(ListShoppingListsResponse { user_id, lists, total })
}

/// Tick an item on or off a list
pub fn mark_purchased(db: &Database, list_id: i64, ingredient_id: i64, purchased: bool) -> Result<MarkPurchasedResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let updated = ShoppingList::set_purchased(&conn, list_id, ingredient_id, purchased)
        .map_err(|e| format!("Failed to update shopping list: {}", e))?;
    if !updated {
        return Err(format!(
            "Ingredient {} is not on shopping list {}",
            ingredient_id, list_id
        ));
    }

    Ok(MarkPurchasedResponse {
        list_id,
        ingredient_id,
        is_purchased: purchased,
    })
}

/// Delete a shopping list and its items
pub fn delete_shopping_list(db: &Database, list_id: i64) -> Result<DeleteShoppingListResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = ShoppingList::delete(&conn, list_id)
        .map_err(|e| format!("Failed to delete shopping list: {}", e))?;
    if !deleted {
        return Err(format!("Shopping list {} not found", list_id));
    }

    Ok(DeleteShoppingListResponse {
        success: true,
        deleted_id: list_id,
    })
}

/// Cook a recipe from the pantry
///
/// If any ingredient is short nothing is changed and the shortfall is
/// returned. Otherwise every needed quantity is deducted from inventory.
pub fn cook_recipe<S>(db: &Database, source: &S, user_id: i64, recipe_id: i64) -> Result<CookRecipeResponse, String>
where
    S: RecipeSource + ?Sized,
{
    {
        let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
        require_user(&conn, user_id)?;
    }

    let aggregation = aggregate_ingredients(source, &[recipe_id]).map_err(|e| e.to_string())?;

    let response = db
        .with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let stock = InventoryItem::stock_levels(&tx, user_id)?;
            let plan = plan_shopping(&aggregation, &stock);
            if !plan.is_fully_stocked() {
                return Ok(CookRecipeResponse {
                    result: false,
                    recipe_id,
                    missing: plan.missing,
                    deducted: Vec::new(),
                });
            }

            for line in &plan.in_inventory {
                if !InventoryItem::deduct(&tx, user_id, line.ingredient_id, line.needed)? {
                    return Err(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows));
                }
            }
            tx.commit()?;

            Ok(CookRecipeResponse {
                result: true,
                recipe_id,
                missing: Vec::new(),
                deducted: plan.in_inventory,
            })
        })
        .map_err(|e| format!("Failed to update inventory: {}", e))?;

    if response.result {
        tracing::info!(user_id, recipe_id, "Cooked recipe");
    } else {
        tracing::info!(user_id, recipe_id, missing = response.missing.len(), "Recipe is short on ingredients");
    }

    Ok(response)
}
