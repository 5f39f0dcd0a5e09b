//! Shopping list calculation
//!
//! Aggregates recipe ingredients into base-unit totals and partitions them
//! against a user's inventory.

pub mod aggregate;
pub mod plan;
pub mod source;

pub use aggregate::{aggregate_ingredients, AggregatedIngredient, Aggregation, RecipeFetchError};
pub use plan::{plan_shopping, PlanLine, ShoppingPlan, StockLevel};
pub use source::{FetchError, IngredientLine, RecipeDetail, RecipeSource};
