//! Ingredient catalog model
//!
//! Ingredients are keyed by the recipe API's ingredient id and cached
//! locally so inventory and shopping list rows can reference them.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub aisle: String,
    pub base_unit: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Ingredient {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            aisle: row.get("aisle")?,
            base_unit: row.get("base_unit")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Insert or refresh a catalog entry
    ///
    /// A known base unit is never overwritten with NULL, and an empty aisle
    /// does not replace a known one.
    pub fn upsert(
        conn: &Connection,
        id: i64,
        name: &str,
        aisle: &str,
        base_unit: Option<&str>,
    ) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO ingredients (id, name, aisle, base_unit)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                aisle = CASE WHEN excluded.aisle = '' THEN ingredients.aisle ELSE excluded.aisle END,
                base_unit = COALESCE(excluded.base_unit, ingredients.base_unit),
                updated_at = datetime('now')
            "#,
            params![id, name, aisle, base_unit],
        )?;

        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM ingredients WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM ingredients", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_connection;

    #[test]
    fn test_upsert_keeps_known_metadata() {
        let conn = test_connection();

        Ingredient::upsert(&conn, 1001, "butter", "Dairy", Some("teaspoons")).unwrap();
        let updated = Ingredient::upsert(&conn, 1001, "salted butter", "", None).unwrap();

        assert_eq!(updated.name, "salted butter");
        assert_eq!(updated.aisle, "Dairy");
        assert_eq!(updated.base_unit.as_deref(), Some("teaspoons"));
        assert_eq!(Ingredient::count(&conn).unwrap(), 1);
    }
}
