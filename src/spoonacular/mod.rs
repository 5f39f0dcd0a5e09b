//! Spoonacular recipe API
//!
//! Search endpoints and the `RecipeSource` implementation used for
//! shopping list aggregation.

pub mod client;
pub mod types;

pub use client::SpoonacularClient;
pub use types::{IngredientMatch, RecipeSearch};
