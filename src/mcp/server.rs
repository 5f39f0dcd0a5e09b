//! Pantry MCP Server Implementation
//!
//! Implements the MCP server with all Pantry tools.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::{Config, SpoonacularConfig};
use crate::db::Database;
use crate::spoonacular::SpoonacularClient;
use crate::tools::inventory::{self, InventoryInput};
use crate::tools::recipes::{self, DEFAULT_RESULTS};
use crate::tools::shopping_lists;
use crate::tools::status::StatusTracker;
use crate::tools::users;

/// Pantry MCP Service
#[derive(Clone)]
pub struct PantryService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    spoonacular: SpoonacularConfig,
    tool_router: ToolRouter<PantryService>,
}

impl PantryService {
    pub fn new(config: Config, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(config.database_path))),
            database,
            spoonacular: config.spoonacular,
            tool_router: Self::tool_router(),
        }
    }
}

/// Run a blocking tool body off the async runtime and render its JSON
async fn run_blocking<T, F>(f: F) -> Result<CallToolResult, McpError>
where
    F: FnOnce() -> Result<T, String> + Send + 'static,
    T: Serialize + Send + 'static,
{
    let result = tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| McpError::internal_error(format!("Tool task failed: {}", e), None))?
        .map_err(|e| McpError::internal_error(e, None))?;
    let json = serde_json::to_string_pretty(&result)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Build the blocking HTTP client; must be called on a blocking thread
fn client(config: &SpoonacularConfig) -> Result<SpoonacularClient, String> {
    SpoonacularClient::new(config.clone()).map_err(|e| e.to_string())
}

// ============================================================================
// User Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CredentialsParams {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UserParams {
    /// User ID returned by login or register_user
    pub user_id: i64,
}

// ============================================================================
// Recipe Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchRecipesParams {
    /// Free text query, e.g. "pasta"
    pub query: String,
    /// Diet filter, e.g. "vegetarian"
    pub diet: Option<String>,
    /// Intolerances to exclude, e.g. ["gluten", "dairy"]
    #[serde(default)]
    pub intolerances: Vec<String>,
    /// Number of results (default 10, max 100)
    #[serde(default = "default_results")]
    pub number: u32,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchByIngredientsParams {
    /// Ingredient names, e.g. ["apples", "flour"]
    pub ingredients: Vec<String>,
    #[serde(default = "default_results")]
    pub number: u32,
}

fn default_results() -> u32 { DEFAULT_RESULTS }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecipeIdParams {
    /// Spoonacular recipe ID
    pub recipe_id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UserRecipeParams {
    pub user_id: i64,
    /// Spoonacular recipe ID
    pub recipe_id: i64,
}

// ============================================================================
// Inventory Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct InventoryItemParams {
    /// Spoonacular ingredient ID
    pub ingredient_id: i64,
    pub name: String,
    /// Store aisle, e.g. "Produce"
    pub aisle: Option<String>,
    pub quantity: f64,
    /// Unit as written, e.g. "pounds", "tbsp", "cloves"
    pub unit: String,
    pub notes: Option<String>,
}

impl From<InventoryItemParams> for InventoryInput {
    fn from(p: InventoryItemParams) -> Self {
        Self {
            ingredient_id: p.ingredient_id,
            name: p.name,
            aisle: p.aisle,
            quantity: p.quantity,
            unit: p.unit,
            notes: p.notes,
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetInventoryItemParams {
    pub user_id: i64,
    #[serde(flatten)]
    pub item: InventoryItemParams,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RestockInventoryParams {
    pub user_id: i64,
    /// Purchased amounts to add
    pub items: Vec<InventoryItemParams>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RemoveInventoryItemParams {
    pub user_id: i64,
    pub ingredient_id: i64,
}

// ============================================================================
// Shopping List Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateShoppingListParams {
    pub user_id: i64,
    /// Recipes to shop for; repeat an ID to double it. Defaults to all saved recipes.
    pub recipe_ids: Option<Vec<i64>>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ShoppingListIdParams {
    pub list_id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MarkPurchasedParams {
    pub list_id: i64,
    pub ingredient_id: i64,
    /// Defaults to true; pass false to uncheck
    #[serde(default = "default_purchased")]
    pub purchased: bool,
}

fn default_purchased() -> bool { true }

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl PantryService {
    // --- Status ---

    #[tool(description = "Get the current status of the Pantry service including build info, database status, row counts, and process information")]
    async fn pantry_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.clone();
        let db = self.database.clone();
        run_blocking(move || Ok(tracker.blocking_lock().get_status(&db))).await
    }

    #[tool(description = "Get step-by-step instructions for planning shopping and managing the pantry. Call this when starting a session or when unsure how units and lists work.")]
    fn pantry_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::PANTRY_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(PANTRY_INSTRUCTIONS)]))
    }

    // --- Users ---

    #[tool(description = "Register a new user. Username must be unique; password at least 3 characters.")]
    async fn register_user(&self, Parameters(p): Parameters<CredentialsParams>) -> Result<CallToolResult, McpError> {
        let db = self.database.clone();
        run_blocking(move || users::register_user(&db, &p.username, &p.password)).await
    }

    #[tool(description = "Log in and get the user_id to pass to other tools")]
    async fn login(&self, Parameters(p): Parameters<CredentialsParams>) -> Result<CallToolResult, McpError> {
        let db = self.database.clone();
        run_blocking(move || users::login(&db, &p.username, &p.password)).await
    }

    // --- Recipes ---

    #[tool(description = "Search Spoonacular recipes by text with optional diet and intolerance filters. Returns full ingredient lists.")]
    async fn search_recipes(&self, Parameters(p): Parameters<SearchRecipesParams>) -> Result<CallToolResult, McpError> {
        let config = self.spoonacular.clone();
        run_blocking(move || {
            recipes::search_recipes(&client(&config)?, &p.query, p.diet, p.intolerances, p.number)
        })
        .await
    }

    #[tool(description = "Find Spoonacular recipes that use the given ingredients, ranked to use as many as possible")]
    async fn search_recipes_by_ingredients(&self, Parameters(p): Parameters<SearchByIngredientsParams>) -> Result<CallToolResult, McpError> {
        let config = self.spoonacular.clone();
        run_blocking(move || recipes::search_recipes_by_ingredients(&client(&config)?, &p.ingredients, p.number)).await
    }

    #[tool(description = "Get full recipe information including ingredients with amounts, units and aisles")]
    async fn get_recipe_info(&self, Parameters(p): Parameters<RecipeIdParams>) -> Result<CallToolResult, McpError> {
        let config = self.spoonacular.clone();
        run_blocking(move || recipes::get_recipe_info(&client(&config)?, p.recipe_id)).await
    }

    #[tool(description = "Save a recipe to a user's list for later shopping")]
    async fn save_recipe(&self, Parameters(p): Parameters<UserRecipeParams>) -> Result<CallToolResult, McpError> {
        let db = self.database.clone();
        let config = self.spoonacular.clone();
        run_blocking(move || recipes::save_recipe(&db, &client(&config)?, p.user_id, p.recipe_id)).await
    }

    #[tool(description = "List a user's saved recipes")]
    async fn list_saved_recipes(&self, Parameters(p): Parameters<UserParams>) -> Result<CallToolResult, McpError> {
        let db = self.database.clone();
        run_blocking(move || recipes::list_saved_recipes(&db, p.user_id)).await
    }

    #[tool(description = "Remove a recipe from a user's saved recipes")]
    async fn remove_saved_recipe(&self, Parameters(p): Parameters<UserRecipeParams>) -> Result<CallToolResult, McpError> {
        let db = self.database.clone();
        run_blocking(move || recipes::remove_saved_recipe(&db, p.user_id, p.recipe_id)).await
    }

    // --- Inventory ---

    #[tool(description = "Set how much of an ingredient a user has, replacing any previous amount. Pounds are stored as ounces and tablespoons as teaspoons.")]
    async fn set_inventory_item(&self, Parameters(p): Parameters<SetInventoryItemParams>) -> Result<CallToolResult, McpError> {
        let db = self.database.clone();
        run_blocking(move || inventory::set_inventory_item(&db, p.user_id, p.item.into())).await
    }

    #[tool(description = "Add purchased amounts to a user's inventory in one step. Use after shopping to confirm purchases.")]
    async fn restock_inventory(&self, Parameters(p): Parameters<RestockInventoryParams>) -> Result<CallToolResult, McpError> {
        let db = self.database.clone();
        let items = p.items.into_iter().map(InventoryInput::from).collect();
        run_blocking(move || inventory::restock_inventory(&db, p.user_id, items)).await
    }

    #[tool(description = "List a user's inventory grouped by aisle")]
    async fn list_inventory(&self, Parameters(p): Parameters<UserParams>) -> Result<CallToolResult, McpError> {
        let db = self.database.clone();
        run_blocking(move || inventory::list_inventory(&db, p.user_id)).await
    }

    #[tool(description = "Remove an ingredient from a user's inventory")]
    async fn remove_inventory_item(&self, Parameters(p): Parameters<RemoveInventoryItemParams>) -> Result<CallToolResult, McpError> {
        let db = self.database.clone();
        run_blocking(move || inventory::remove_inventory_item(&db, p.user_id, p.ingredient_id)).await
    }

    // --- Shopping Lists ---

    #[tool(description = "Create a shopping list from recipes (or all saved recipes). Ingredients are summed across recipes and split into in_stock and missing against the user's inventory.")]
    async fn create_shopping_list(&self, Parameters(p): Parameters<CreateShoppingListParams>) -> Result<CallToolResult, McpError> {
        let db = self.database.clone();
        let config = self.spoonacular.clone();
        run_blocking(move || {
            shopping_lists::create_shopping_list(&db, &client(&config)?, p.user_id, p.recipe_ids, p.notes)
        })
        .await
    }

    #[tool(description = "Get a shopping list with its items grouped by aisle")]
    async fn get_shopping_list(&self, Parameters(p): Parameters<ShoppingListIdParams>) -> Result<CallToolResult, McpError> {
        let db = self.database.clone();
        let list_id = p.list_id;
        run_blocking(move || {
            Ok(match shopping_lists::get_shopping_list(&db, list_id)? {
                Some(list) => serde_json::to_value(list).map_err(|e| e.to_string())?,
                None => serde_json::json!({"error": "Shopping list not found", "id": list_id}),
            })
        })
        .await
    }

    #[tool(description = "List a user's shopping lists, newest first")]
    async fn list_shopping_lists(&self, Parameters(p): Parameters<UserParams>) -> Result<CallToolResult, McpError> {
        let db = self.database.clone();
        run_blocking(move || shopping_lists::list_shopping_lists(&db, p.user_id)).await
    }

    #[tool(description = "Mark a shopping list item as purchased (or not)")]
    async fn mark_purchased(&self, Parameters(p): Parameters<MarkPurchasedParams>) -> Result<CallToolResult, McpError> {
        let db = self.database.clone();
        run_blocking(move || shopping_lists::mark_purchased(&db, p.list_id, p.ingredient_id, p.purchased)).await
    }

    #[tool(description = "Delete a shopping list")]
    async fn delete_shopping_list(&self, Parameters(p): Parameters<ShoppingListIdParams>) -> Result<CallToolResult, McpError> {
        let db = self.database.clone();
        run_blocking(move || shopping_lists::delete_shopping_list(&db, p.list_id)).await
    }

    // --- Cooking ---

    #[tool(description = "Cook a recipe from the pantry. If anything is short, returns result=false with the missing items and changes nothing; otherwise deducts the recipe's quantities and returns result=true.")]
    async fn cook_recipe(&self, Parameters(p): Parameters<UserRecipeParams>) -> Result<CallToolResult, McpError> {
        let db = self.database.clone();
        let config = self.spoonacular.clone();
        run_blocking(move || shopping_lists::cook_recipe(&db, &client(&config)?, p.user_id, p.recipe_id)).await
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for PantryService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "pantry".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Pantry Planner".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Pantry Planner - recipe search, pantry inventory and shopping lists. \
                 Call pantry_instructions first. \
                 Users: register_user/login (returns user_id). \
                 Recipes: search_recipes, search_recipes_by_ingredients, get_recipe_info, \
                 save_recipe/list_saved_recipes/remove_saved_recipe. \
                 Inventory: set_inventory_item, restock_inventory, list_inventory, remove_inventory_item. \
                 Shopping: create_shopping_list/get_shopping_list/list_shopping_lists, \
                 mark_purchased, delete_shopping_list. \
                 Cooking: cook_recipe deducts a recipe from inventory only when everything is in stock."
                    .into(),
            ),
        }
    }
}
