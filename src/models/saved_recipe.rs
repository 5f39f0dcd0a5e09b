//! Saved recipe model
//!
//! A Spoonacular recipe a user has picked for later shopping.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedRecipe {
    pub id: i64,
    pub user_id: i64,
    pub recipe_id: i64,
    pub title: String,
    pub image: Option<String>,
    pub created_at: String,
}

/// Data for saving a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedRecipeCreate {
    pub user_id: i64,
    pub recipe_id: i64,
    pub title: String,
    pub image: Option<String>,
}

impl SavedRecipe {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            recipe_id: row.get("recipe_id")?,
            title: row.get("title")?,
            image: row.get("image")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Save a recipe for a user; saving the same recipe again refreshes title and image
    pub fn upsert(conn: &Connection, data: &SavedRecipeCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO saved_recipes (user_id, recipe_id, title, image)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(user_id, recipe_id) DO UPDATE SET
                title = excluded.title,
                image = excluded.image
            "#,
            params![data.user_id, data.recipe_id, data.title, data.image],
        )?;

        Self::get(conn, data.user_id, data.recipe_id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    pub fn get(conn: &Connection, user_id: i64, recipe_id: i64) -> DbResult<Option<Self>> {
        let mut stmt =
            conn.prepare("SELECT * FROM saved_recipes WHERE user_id = ?1 AND recipe_id = ?2")?;

        match stmt.query_row(params![user_id, recipe_id], Self::from_row) {
            Ok(recipe) => Ok(Some(recipe)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// A user's saved recipes, oldest first
    pub fn list_for_user(conn: &Connection, user_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt =
            conn.prepare("SELECT * FROM saved_recipes WHERE user_id = ?1 ORDER BY id ASC")?;

        let recipes = stmt
            .query_map([user_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(recipes)
    }

    /// Returns Ok(true) if removed, Ok(false) if it was not saved
    pub fn delete(conn: &Connection, user_id: i64, recipe_id: i64) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM saved_recipes WHERE user_id = ?1 AND recipe_id = ?2",
            params![user_id, recipe_id],
        )?;
        Ok(rows > 0)
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM saved_recipes", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_connection;
    use crate::models::User;

    #[test]
    fn test_upsert_list_delete() {
        let conn = test_connection();
        let user = User::create(&conn, "bob", "hash").unwrap();

        let data = SavedRecipeCreate {
            user_id: user.id,
            recipe_id: 716429,
            title: "Pasta".to_string(),
            image: None,
        };
        SavedRecipe::upsert(&conn, &data).unwrap();
        let again = SavedRecipe::upsert(
            &conn,
            &SavedRecipeCreate {
                title: "Pasta with Garlic".to_string(),
                ..data.clone()
            },
        )
        .unwrap();
        assert_eq!(again.title, "Pasta with Garlic");

        let list = SavedRecipe::list_for_user(&conn, user.id).unwrap();
        assert_eq!(list.len(), 1);

        assert!(SavedRecipe::delete(&conn, user.id, 716429).unwrap());
        assert!(!SavedRecipe::delete(&conn, user.id, 716429).unwrap());
    }
}
