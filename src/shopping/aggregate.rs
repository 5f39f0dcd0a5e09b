//! Ingredient aggregation
//!
//! Folds the ingredient lines of several recipes into one total per
//! ingredient, with every quantity expressed in its base unit.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::source::{FetchError, RecipeSource};
use crate::units::{commensurable, convert_to_base_unit};

/// Aggregation failed because one recipe could not be fetched
#[derive(Debug, Error)]
#[error("Failed to fetch recipe {recipe_id}: {source}")]
pub struct RecipeFetchError {
    pub recipe_id: i64,
    #[source]
    pub source: FetchError,
}

/// Running total for one ingredient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedIngredient {
    pub quantity: f64,
    /// Base unit of the first occurrence
    pub unit: String,
    pub name: String,
    pub aisle: String,
    /// Set when a later occurrence converted to a different unit than `unit`
    #[serde(default)]
    pub unit_conflict: bool,
}

/// Aggregated ingredients keyed by ingredient id
pub type Aggregation = BTreeMap<i64, AggregatedIngredient>;

/// Aggregate the ingredients of the given recipes
///
/// Recipes are fetched one at a time in input order. A repeated id is
/// fetched and counted again. The first occurrence of an ingredient fixes its
/// unit, name and aisle; later occurrences only add quantity.
///
/// If any fetch fails the whole call fails and nothing is returned.
pub fn aggregate_ingredients<S>(source: &S, recipe_ids: &[i64]) -> Result<Aggregation, RecipeFetchError>
where
    S: RecipeSource + ?Sized,
{
    let mut totals = Aggregation::new();

    for &recipe_id in recipe_ids {
        let detail = source
            .fetch_recipe_detail(recipe_id)
            .map_err(|source| RecipeFetchError { recipe_id, source })?;

        tracing::debug!(
            recipe_id,
            ingredients = detail.ingredients.len(),
            "Aggregating recipe"
        );

        for line in &detail.ingredients {
            let (quantity, unit) = convert_to_base_unit(line.amount, &line.unit);

            match totals.get_mut(&line.id) {
                Some(entry) => {
                    if !commensurable(&entry.unit, &unit) {
                        tracing::warn!(
                            ingredient_id = line.id,
                            recipe_id,
                            expected = %entry.unit,
                            found = %unit,
                            "Ingredient appears with a different base unit; summing against first-seen unit"
                        );
                        entry.unit_conflict = true;
                    }
                    entry.quantity += quantity;
                }
                None => {
                    totals.insert(
                        line.id,
                        AggregatedIngredient {
                            quantity,
                            unit,
                            name: line.name.clone(),
                            aisle: line.aisle.clone(),
                            unit_conflict: false,
                        },
                    );
                }
            }
        }
    }

    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shopping::source::fake::{line, FakeRecipeSource};

    const APPLE: i64 = 9003;
    const BANANA: i64 = 9040;
    const BUTTER: i64 = 1001;

    fn recipe_a_source() -> FakeRecipeSource {
        FakeRecipeSource::new().with_recipe(
            1,
            vec![
                line(APPLE, "apple", "Produce", 1.0, "pound"),
                line(BANANA, "banana", "Produce", 3.0, "ounces"),
            ],
        )
    }

    #[test]
    fn test_single_recipe() {
        let source = recipe_a_source();
        let totals = aggregate_ingredients(&source, &[1]).unwrap();

        assert_eq!(totals.len(), 2);
        assert_eq!(totals[&APPLE].quantity, 16.0);
        assert_eq!(totals[&APPLE].unit, "ounces");
        assert_eq!(totals[&APPLE].name, "apple");
        assert_eq!(totals[&APPLE].aisle, "Produce");
        assert_eq!(totals[&BANANA].quantity, 3.0);
        assert_eq!(totals[&BANANA].unit, "ounces");
    }

    #[test]
    fn test_same_recipe_twice_doubles() {
        let source = recipe_a_source();
        let totals = aggregate_ingredients(&source, &[1, 1]).unwrap();

        assert_eq!(totals[&APPLE].quantity, 32.0);
        assert_eq!(totals[&BANANA].quantity, 6.0);
        // no dedupe: two fetches
        assert_eq!(*source.calls.borrow(), vec![1, 1]);
    }

    #[test]
    fn test_empty_input() {
        let source = recipe_a_source();
        let totals = aggregate_ingredients(&source, &[]).unwrap();
        assert!(totals.is_empty());
        assert!(source.calls.borrow().is_empty());
    }

    #[test]
    fn test_sums_across_recipes_after_conversion() {
        let source = FakeRecipeSource::new()
            .with_recipe(1, vec![line(BUTTER, "butter", "Milk, Eggs, Other Dairy", 2.0, "Tbsps")])
            .with_recipe(2, vec![line(BUTTER, "butter", "Milk, Eggs, Other Dairy", 1.0, "teaspoons")]);

        let totals = aggregate_ingredients(&source, &[1, 2]).unwrap();
        assert_eq!(totals[&BUTTER].quantity, 7.0);
        assert_eq!(totals[&BUTTER].unit, "teaspoons");
        assert!(!totals[&BUTTER].unit_conflict);
    }

    #[test]
    fn test_first_seen_metadata_wins() {
        let source = FakeRecipeSource::new()
            .with_recipe(1, vec![line(BUTTER, "butter", "Dairy", 1.0, "tbsp")])
            .with_recipe(2, vec![line(BUTTER, "unsalted butter", "Baking", 1.0, "tbsp")]);

        let totals = aggregate_ingredients(&source, &[1, 2]).unwrap();
        assert_eq!(totals[&BUTTER].name, "butter");
        assert_eq!(totals[&BUTTER].aisle, "Dairy");
        assert_eq!(totals[&BUTTER].quantity, 6.0);
    }

    #[test]
    fn test_unit_conflict_is_flagged_but_summed() {
        let source = FakeRecipeSource::new()
            .with_recipe(1, vec![line(BUTTER, "butter", "Dairy", 1.0, "pound")])
            .with_recipe(2, vec![line(BUTTER, "butter", "Dairy", 2.0, "tbsp")]);

        let totals = aggregate_ingredients(&source, &[1, 2]).unwrap();
        assert_eq!(totals[&BUTTER].unit, "ounces");
        assert_eq!(totals[&BUTTER].quantity, 22.0);
        assert!(totals[&BUTTER].unit_conflict);
    }

    #[test]
    fn test_base_unit_spellings_sum_without_conflict() {
        let source = FakeRecipeSource::new()
            .with_recipe(1, vec![line(BANANA, "banana", "Produce", 1.0, "ounce")])
            .with_recipe(2, vec![line(BANANA, "banana", "Produce", 2.0, "ounces")])
            .with_recipe(3, vec![line(BUTTER, "butter", "Dairy", 1.0, "tsp"), line(BUTTER, "butter", "Dairy", 1.0, "tbsp")]);

        let totals = aggregate_ingredients(&source, &[1, 2, 3]).unwrap();
        assert_eq!(totals[&BANANA].quantity, 3.0);
        assert_eq!(totals[&BANANA].unit, "ounce");
        assert!(!totals[&BANANA].unit_conflict);

        assert_eq!(totals[&BUTTER].quantity, 4.0);
        assert!(!totals[&BUTTER].unit_conflict);
    }

    #[test]
    fn test_fetch_failure_fails_whole_call() {
        let source = recipe_a_source();
        let err = aggregate_ingredients(&source, &[1, 404, 1]).unwrap_err();

        assert_eq!(err.recipe_id, 404);
        assert!(matches!(err.source, FetchError::NotFound(404)));
        // stops at the failing recipe
        assert_eq!(*source.calls.borrow(), vec![1, 404]);
    }

    #[test]
    fn test_works_through_trait_object() {
        let source = recipe_a_source();
        let dyn_source: &dyn RecipeSource = &source;
        let totals = aggregate_ingredients(dyn_source, &[1]).unwrap();
        assert_eq!(totals.len(), 2);
    }
}
