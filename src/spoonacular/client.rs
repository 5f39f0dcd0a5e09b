//! Spoonacular recipe API client
//!
//! Blocking client; callers in async context must run it on a blocking
//! thread (`tokio::task::spawn_blocking`).

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::types::{
    FindByIngredientsEntry, IngredientMatch, RecipeInformationResponse, RecipeSearch,
    SearchResponse,
};
use crate::config::SpoonacularConfig;
use crate::shopping::{FetchError, RecipeDetail, RecipeSource};

/// Maximum results per search request
pub const MAX_RESULTS: u32 = 100;

pub struct SpoonacularClient {
    config: SpoonacularConfig,
    http: Client,
}

impl SpoonacularClient {
    pub fn new(config: SpoonacularConfig) -> Result<Self, FetchError> {
        if config.api_key.trim().is_empty() {
            return Err(FetchError::MissingApiKey);
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, http })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// GET a JSON document; 404 is reported as `None`
    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>, FetchError> {
        let url = self.url(path);
        tracing::debug!(%url, "Spoonacular request");

        let response = self
            .http
            .get(&url)
            .header("X-Mashape-Key", &self.config.api_key)
            .header("Accept", "application/json")
            .query(query)
            .send()?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = response.text()?;
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "Spoonacular request failed");
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(Some(serde_json::from_str(&body)?))
    }

    /// Full information for one recipe, including ingredients
    pub fn recipe_information(&self, recipe_id: i64) -> Result<RecipeDetail, FetchError> {
        let path = format!("/recipes/{}/information", recipe_id);
        let resp: RecipeInformationResponse = self
            .get_json(&path, &[("includeNutrition", "false".to_string())])?
            .ok_or(FetchError::NotFound(recipe_id))?;
        Ok(resp.into())
    }

    /// Search recipes, then fetch full information for each hit
    pub fn search_recipes(&self, search: &RecipeSearch) -> Result<Vec<RecipeDetail>, FetchError> {
        let number = search.number.clamp(1, MAX_RESULTS);
        let query = vec![
            ("diet", search.diet.clone().unwrap_or_default()),
            ("intolerances", search.intolerances.join(",")),
            ("number", number.to_string()),
            ("query", search.query.clone()),
        ];

        let resp: SearchResponse = self.get_json("/recipes/search", &query)?.unwrap_or(SearchResponse {
            results: Vec::new(),
        });

        tracing::info!(query = %search.query, hits = resp.results.len(), "Recipe search");

        resp.results
            .iter()
            .map(|hit| self.recipe_information(hit.id))
            .collect()
    }

    /// Recipes that use the given ingredients
    pub fn search_by_ingredients(
        &self,
        ingredients: &[String],
        number: u32,
    ) -> Result<Vec<IngredientMatch>, FetchError> {
        let query = vec![
            ("fillIngredients", "true".to_string()),
            ("ingredients", ingredients.join(",")),
            ("limitLicense", "false".to_string()),
            ("number", number.clamp(1, MAX_RESULTS).to_string()),
            ("ranking", "1".to_string()),
        ];

        let entries: Vec<FindByIngredientsEntry> = self
            .get_json("/recipes/findByIngredients", &query)?
            .unwrap_or_default();

        Ok(entries.into_iter().map(IngredientMatch::from).collect())
    }
}

impl RecipeSource for SpoonacularClient {
    fn fetch_recipe_detail(&self, recipe_id: i64) -> Result<RecipeDetail, FetchError> {
        self.recipe_information(recipe_id)
    }
}
