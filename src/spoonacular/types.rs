//! Spoonacular response types
//!
//! Wire shapes for the endpoints we call, and their conversion into the
//! domain types used by the shopping module.

use serde::{Deserialize, Serialize};

use crate::shopping::{IngredientLine, RecipeDetail};

/// `GET /recipes/{id}/information`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RecipeInformationResponse {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    pub image: Option<String>,
    pub servings: Option<f64>,
    pub ready_in_minutes: Option<i64>,
    pub source_url: Option<String>,
    #[serde(default)]
    pub extended_ingredients: Vec<ExtendedIngredient>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExtendedIngredient {
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    pub aisle: Option<String>,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub unit: String,
    /// Only present on findByIngredients results
    pub unit_long: Option<String>,
    pub measures: Option<Measures>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Measures {
    pub us: Option<Measure>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Measure {
    #[serde(default)]
    pub unit_long: String,
}

impl ExtendedIngredient {
    /// Prefer the long unit name; the short one is often empty or abbreviated
    fn long_unit(&self) -> String {
        let from_measures = self
            .measures
            .as_ref()
            .and_then(|m| m.us.as_ref())
            .map(|us| us.unit_long.trim())
            .filter(|u| !u.is_empty());

        let from_field = self.unit_long.as_deref().map(str::trim).filter(|u| !u.is_empty());

        from_measures
            .or(from_field)
            .unwrap_or_else(|| self.unit.trim())
            .to_string()
    }

    /// Lines without an id cannot be aggregated and are dropped with a warning
    pub fn into_line(self, recipe_id: i64) -> Option<IngredientLine> {
        let unit = self.long_unit();
        let Some(id) = self.id else {
            tracing::warn!(
                recipe_id,
                ingredient = %self.name,
                amount = self.amount,
                %unit,
                "Dropping ingredient line without an id"
            );
            return None;
        };
        Some(IngredientLine {
            id,
            name: self.name,
            aisle: self.aisle.unwrap_or_default(),
            amount: self.amount,
            unit,
        })
    }
}

impl From<RecipeInformationResponse> for RecipeDetail {
    fn from(resp: RecipeInformationResponse) -> Self {
        let recipe_id = resp.id;
        let ingredients = resp
            .extended_ingredients
            .into_iter()
            .filter_map(|line| line.into_line(recipe_id))
            .collect();

        Self {
            id: resp.id,
            title: resp.title,
            image: resp.image,
            servings: resp.servings,
            ready_in_minutes: resp.ready_in_minutes,
            source_url: resp.source_url,
            ingredients,
        }
    }
}

/// `GET /recipes/search`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResult {
    pub id: i64,
}

/// `GET /recipes/findByIngredients` entry
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FindByIngredientsEntry {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    pub image: Option<String>,
    #[serde(default)]
    pub used_ingredient_count: i64,
    #[serde(default)]
    pub missed_ingredient_count: i64,
    #[serde(default)]
    pub used_ingredients: Vec<ExtendedIngredient>,
    #[serde(default)]
    pub missed_ingredients: Vec<ExtendedIngredient>,
}

/// A recipe matched by ingredient search
#[derive(Debug, Clone, Serialize)]
pub struct IngredientMatch {
    pub id: i64,
    pub title: String,
    pub image: Option<String>,
    pub used_ingredient_count: i64,
    pub missed_ingredient_count: i64,
    pub used_ingredients: Vec<IngredientLine>,
    pub missed_ingredients: Vec<IngredientLine>,
}

impl From<FindByIngredientsEntry> for IngredientMatch {
    fn from(entry: FindByIngredientsEntry) -> Self {
        let recipe_id = entry.id;
        Self {
            id: entry.id,
            title: entry.title,
            image: entry.image,
            used_ingredient_count: entry.used_ingredient_count,
            missed_ingredient_count: entry.missed_ingredient_count,
            used_ingredients: entry
                .used_ingredients
                .into_iter()
                .filter_map(|line| line.into_line(recipe_id))
                .collect(),
            missed_ingredients: entry
                .missed_ingredients
                .into_iter()
                .filter_map(|line| line.into_line(recipe_id))
                .collect(),
        }
    }
}

/// Filters for a recipe search
#[derive(Debug, Clone, Default)]
pub struct RecipeSearch {
    pub query: String,
    pub diet: Option<String>,
    pub intolerances: Vec<String>,
    pub number: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    const INFORMATION: &str = r#"{
        "id": 716429,
        "title": "Pasta with Garlic",
        "image": "https://img.example/716429.jpg",
        "servings": 2,
        "readyInMinutes": 45,
        "sourceUrl": "https://example.com/pasta",
        "extendedIngredients": [
            {
                "id": 1001,
                "aisle": "Milk, Eggs, Other Dairy",
                "name": "butter",
                "amount": 1.0,
                "unit": "tbsp",
                "measures": { "us": { "amount": 1.0, "unitShort": "Tbsp", "unitLong": "Tbsp" } }
            },
            {
                "id": 11215,
                "aisle": null,
                "name": "garlic",
                "amount": 2.0,
                "unit": "cloves",
                "measures": { "us": { "amount": 2.0, "unitShort": "cloves", "unitLong": "" } }
            },
            { "id": null, "name": "love", "amount": 1.0, "unit": "" }
        ]
    }"#;

    #[test]
    fn test_parse_recipe_information() {
        let resp: RecipeInformationResponse = serde_json::from_str(INFORMATION).unwrap();
        let detail: RecipeDetail = resp.into();

        assert_eq!(detail.id, 716429);
        assert_eq!(detail.servings, Some(2.0));
        assert_eq!(detail.ready_in_minutes, Some(45));
        assert_eq!(detail.ingredients.len(), 2);

        let butter = &detail.ingredients[0];
        assert_eq!(butter.unit, "Tbsp");
        assert_eq!(butter.aisle, "Milk, Eggs, Other Dairy");

        let garlic = &detail.ingredients[1];
        assert_eq!(garlic.unit, "cloves");
        assert_eq!(garlic.aisle, "");
    }

    #[test]
    fn test_ingredient_without_id_is_dropped() {
        let body = r#"{
            "id": 5,
            "title": "Toast",
            "extendedIngredients": [
                { "id": null, "name": "love", "amount": 1.0, "unit": "" },
                { "name": "salt", "aisle": "Spices", "amount": 1.0, "unit": "pinch" },
                { "id": 18064, "name": "bread", "aisle": "Bakery", "amount": 2.0, "unit": "slices" }
            ]
        }"#;

        let resp: RecipeInformationResponse = serde_json::from_str(body).unwrap();
        let detail: RecipeDetail = resp.into();

        let names: Vec<&str> = detail.ingredients.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["bread"]);
    }

    #[test]
    fn test_parse_find_by_ingredients() {
        let body = r#"[{
            "id": 641803,
            "title": "Easy & Delish! ~ Apple Crumble ~",
            "image": "https://img.example/641803.jpg",
            "usedIngredientCount": 1,
            "missedIngredientCount": 1,
            "usedIngredients": [
                { "id": 9003, "name": "apples", "aisle": "Produce", "amount": 6.0, "unit": "large", "unitLong": "larges" }
            ],
            "missedIngredients": [
                { "id": 1001, "name": "butter", "aisle": "Dairy", "amount": 0.5, "unit": "cup", "unitLong": "cups" }
            ]
        }]"#;

        let entries: Vec<FindByIngredientsEntry> = serde_json::from_str(body).unwrap();
        let matches: Vec<IngredientMatch> = entries.into_iter().map(Into::into).collect();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].used_ingredients[0].unit, "larges");
        assert_eq!(matches[0].missed_ingredients[0].unit, "cups");
        assert_eq!(matches[0].missed_ingredient_count, 1);
    }
}
