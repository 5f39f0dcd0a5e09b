//! Data models
//!
//! Rust structs representing database entities.

mod ingredient;
mod inventory;
mod saved_recipe;
mod shopping_list;
mod user;

pub use ingredient::Ingredient;
pub use inventory::{InventoryItem, InventoryItemDetail};
pub use saved_recipe::{SavedRecipe, SavedRecipeCreate};
pub use shopping_list::{ItemStatus, ShoppingList, ShoppingListItem, ShoppingListSummary};
pub use user::User;
