//! Recipe Tools
//!
//! Recipe search through Spoonacular, and a user's saved recipes.

use serde::Serialize;

use crate::db::Database;
use crate::models::{SavedRecipe, SavedRecipeCreate};
use crate::shopping::{RecipeDetail, RecipeSource};
use crate::spoonacular::{IngredientMatch, RecipeSearch, SpoonacularClient};
use crate::tools::users::require_user;

/// Default number of search results
pub const DEFAULT_RESULTS: u32 = 10;

/// Response for search_recipes
#[derive(Debug, Serialize)]
pub struct SearchRecipesResponse {
    pub recipes: Vec<RecipeDetail>,
    pub total: usize,
}

/// Response for search_recipes_by_ingredients
#[derive(Debug, Serialize)]
pub struct IngredientSearchResponse {
    pub recipes: Vec<IngredientMatch>,
    pub total: usize,
}

/// Response for list_saved_recipes
#[derive(Debug, Serialize)]
pub struct SavedRecipesResponse {
    pub user_id: i64,
    pub recipes: Vec<SavedRecipe>,
    pub total: usize,
}

/// Response for remove_saved_recipe
#[derive(Debug, Serialize)]
pub struct RemoveSavedRecipeResponse {
    pub success: bool,
    pub recipe_id: i64,
}

/// Search recipes by text with optional diet and intolerance filters
pub fn search_recipes(
    client: &SpoonacularClient,
    query: &str,
    diet: Option<String>,
    intolerances: Vec<String>,
    number: u32,
) -> Result<SearchRecipesResponse, String> {
    let query = query.trim();
    if query.is_empty() {
        return Err("Search query cannot be empty".to_string());
    }

    let search = RecipeSearch {
        query: query.to_string(),
        diet: diet.filter(|d| !d.trim().is_empty()),
        intolerances,
        number,
    };

    let recipes = client
        .search_recipes(&search)
        .map_err(|e| format!("Recipe search failed: {}", e))?;
    let total = recipes.len();

    Ok(SearchRecipesResponse { recipes, total })
}

/// Find recipes that use the given ingredients
pub fn search_recipes_by_ingredients(
    client: &SpoonacularClient,
    ingredients: &[String],
    number: u32,
) -> Result<IngredientSearchResponse, String> {
    let ingredients: Vec<String> = ingredients
        .iter()
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .collect();
    if ingredients.is_empty() {
        return Err("At least one ingredient is required".to_string());
    }

    let recipes = client
        .search_by_ingredients(&ingredients, number)
        .map_err(|e| format!("Recipe search failed: {}", e))?;
    let total = recipes.len();

    Ok(IngredientSearchResponse { recipes, total })
}

/// Full information for one recipe
pub fn get_recipe_info<S>(source: &S, recipe_id: i64) -> Result<RecipeDetail, String>
where
    S: RecipeSource + ?Sized,
{
    source
        .fetch_recipe_detail(recipe_id)
        .map_err(|e| format!("Failed to get recipe {}: {}", recipe_id, e))
}

/// Save a recipe for a user, looking up its title and image
pub fn save_recipe<S>(db: &Database, source: &S, user_id: i64, recipe_id: i64) -> Result<SavedRecipe, String>
where
    S: RecipeSource + ?Sized,
{
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    require_user(&conn, user_id)?;

    let detail = get_recipe_info(source, recipe_id)?;

    let saved = SavedRecipe::upsert(
        &conn,
        &SavedRecipeCreate {
            user_id,
            recipe_id,
            title: detail.title,
            image: detail.image,
        },
    )
    .map_err(|e| format!("Failed to save recipe: {}", e))?;

    tracing::info!(user_id, recipe_id, "Saved recipe");
    Ok(saved)
}

/// A user's saved recipes
pub fn list_saved_recipes(db: &Database, user_id: i64) -> Result<SavedRecipesResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    require_user(&conn, user_id)?;

    let recipes = SavedRecipe::list_for_user(&conn, user_id)
        .map_err(|e| format!("Failed to list saved recipes: {}", e))?;
    let total = recipes.len();

    Ok(SavedRecipesResponse {
        user_id,
        recipes,
        total,
    })
}

/// Forget a saved recipe
pub fn remove_saved_recipe(db: &Database, user_id: i64, recipe_id: i64) -> Result<RemoveSavedRecipeResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let removed = SavedRecipe::delete(&conn, user_id, recipe_id)
        .map_err(|e| format!("Failed to remove saved recipe: {}", e))?;
    if !removed {
        return Err(format!("Recipe {} is not saved for user {}", recipe_id, user_id));
    }

    Ok(RemoveSavedRecipeResponse {
        success: true,
        recipe_id,
    })
}
