//! Runtime configuration
//!
//! Everything is read from the environment.

use std::path::PathBuf;

/// Default Spoonacular endpoint (RapidAPI/Mashape gateway)
pub const DEFAULT_SPOONACULAR_BASE_URL: &str =
    "https://spoonacular-recipe-food-nutrition-v1.p.mashape.com";

/// Spoonacular API client configuration
#[derive(Debug, Clone)]
pub struct SpoonacularConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for SpoonacularConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_SPOONACULAR_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl SpoonacularConfig {
    /// Read from `SPOONACULAR_API_KEY` (or legacy `secret_key`),
    /// `SPOONACULAR_BASE_URL` and `SPOONACULAR_TIMEOUT_SECS`
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_key = std::env::var("SPOONACULAR_API_KEY")
            .or_else(|_| std::env::var("secret_key"))
            .unwrap_or_default();

        let base_url = std::env::var("SPOONACULAR_BASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.base_url);

        let timeout_secs = std::env::var("SPOONACULAR_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .filter(|&secs: &u64| secs > 0)
            .unwrap_or(defaults.timeout_secs);

        Self {
            api_key,
            base_url,
            timeout_secs,
        }
    }
}

/// Get the database path from environment or use default
///
/// Defaults to `data/pantry.db` at the project root when run from
/// `target/{debug,release}`, otherwise next to the executable.
pub fn database_path() -> PathBuf {
    std::env::var("PANTRY_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
                    path = grandparent.to_path_buf();
                }
            }

            path.push("data");
            path.push("pantry.db");
            path
        })
}

/// Full server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub spoonacular: SpoonacularConfig,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_path: database_path(),
            spoonacular: SpoonacularConfig::from_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spoonacular_defaults() {
        let config = SpoonacularConfig::default();
        assert_eq!(config.base_url, DEFAULT_SPOONACULAR_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn test_database_path_ends_with_db_file() {
        // only meaningful when the override is absent
        if std::env::var("PANTRY_DATABASE_PATH").is_err() {
            assert!(database_path().ends_with("data/pantry.db"));
        }
    }
}
