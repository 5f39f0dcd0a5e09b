//! Recipe source collaborator
//!
//! The aggregator only needs one thing from the outside world: the
//! ingredient list of a recipe. `RecipeSource` is that seam.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while fetching recipe data
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Recipe API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Recipe {0} not found")]
    NotFound(i64),

    #[error("Failed to decode recipe API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Recipe API key is not configured (set SPOONACULAR_API_KEY)")]
    MissingApiKey,
}

/// One ingredient line of a recipe, as reported by the recipe API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientLine {
    pub id: i64,
    pub name: String,
    pub aisle: String,
    pub amount: f64,
    /// Long-form unit name, e.g. "pounds" or "Tbsps"
    pub unit: String,
}

/// A recipe with its ingredient lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetail {
    pub id: i64,
    pub title: String,
    pub image: Option<String>,
    pub servings: Option<f64>,
    pub ready_in_minutes: Option<i64>,
    pub source_url: Option<String>,
    pub ingredients: Vec<IngredientLine>,
}

/// Anything that can look up a recipe's ingredients by id
pub trait RecipeSource {
    fn fetch_recipe_detail(&self, recipe_id: i64) -> Result<RecipeDetail, FetchError>;
}

impl<T: RecipeSource + ?Sized> RecipeSource for &T {
    fn fetch_recipe_detail(&self, recipe_id: i64) -> Result<RecipeDetail, FetchError> {
        (**self).fetch_recipe_detail(recipe_id)
    }
}

/// In-memory recipe source for tests
#[cfg(test)]
pub mod fake {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;

    #[derive(Default)]
    pub struct FakeRecipeSource {
        recipes: HashMap<i64, RecipeDetail>,
        pub calls: RefCell<Vec<i64>>,
    }

    impl FakeRecipeSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_recipe(mut self, id: i64, lines: Vec<IngredientLine>) -> Self {
            self.recipes.insert(
                id,
                RecipeDetail {
                    id,
                    title: format!("Recipe {}", id),
                    image: None,
                    servings: Some(2.0),
                    ready_in_minutes: None,
                    source_url: None,
                    ingredients: lines,
                },
            );
            self
        }
    }

    impl RecipeSource for FakeRecipeSource {
        fn fetch_recipe_detail(&self, recipe_id: i64) -> Result<RecipeDetail, FetchError> {
            self.calls.borrow_mut().push(recipe_id);
            self.recipes
                .get(&recipe_id)
                .cloned()
                .ok_or(FetchError::NotFound(recipe_id))
        }
    }

    pub fn line(id: i64, name: &str, aisle: &str, amount: f64, unit: &str) -> IngredientLine {
        IngredientLine {
            id,
            name: name.to_string(),
            aisle: aisle.to_string(),
            amount,
            unit: unit.to_string(),
        }
    }
}
