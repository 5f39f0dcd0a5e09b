//! Inventory model
//!
//! A user's stock of an ingredient. Quantities are stored in base unit.

use std::collections::HashMap;

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use crate::shopping::StockLevel;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: i64,
    pub user_id: i64,
    pub ingredient_id: i64,
    pub quantity: f64,
    pub unit: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Inventory item joined with its ingredient name and aisle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItemDetail {
    pub ingredient_id: i64,
    pub name: String,
    pub aisle: String,
    pub quantity: f64,
    pub unit: String,
    pub notes: Option<String>,
    pub updated_at: String,
}

impl InventoryItem {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            ingredient_id: row.get("ingredient_id")?,
            quantity: row.get("quantity")?,
            unit: row.get("unit")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Set the stock of an ingredient, replacing any previous amount
    pub fn set(
        conn: &Connection,
        user_id: i64,
        ingredient_id: i64,
        quantity: f64,
        unit: &str,
        notes: Option<&str>,
    ) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO inventory_items (user_id, ingredient_id, quantity, unit, notes)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(user_id, ingredient_id) DO UPDATE SET
                quantity = excluded.quantity,
                unit = excluded.unit,
                notes = COALESCE(excluded.notes, inventory_items.notes),
                updated_at = datetime('now')
            "#,
            params![user_id, ingredient_id, quantity, unit, notes],
        )?;

        Self::get(conn, user_id, ingredient_id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    pub fn get(conn: &Connection, user_id: i64, ingredient_id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM inventory_items WHERE user_id = ?1 AND ingredient_id = ?2",
        )?;

        match stmt.query_row(params![user_id, ingredient_id], Self::from_row) {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// A user's inventory grouped by aisle, then name
    pub fn list_details(conn: &Connection, user_id: i64) -> DbResult<Vec<InventoryItemDetail>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT inv.ingredient_id, i.name, i.aisle, inv.quantity, inv.unit,
                   inv.notes, inv.updated_at
            FROM inventory_items inv
            INNER JOIN ingredients i ON i.id = inv.ingredient_id
            WHERE inv.user_id = ?1
            ORDER BY i.aisle ASC, i.name ASC
            "#,
        )?;

        let items = stmt
            .query_map([user_id], |row| {
                Ok(InventoryItemDetail {
                    ingredient_id: row.get(0)?,
                    name: row.get(1)?,
                    aisle: row.get(2)?,
                    quantity: row.get(3)?,
                    unit: row.get(4)?,
                    notes: row.get(5)?,
                    updated_at: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// Stock levels keyed by ingredient id, for shopping plans
    pub fn stock_levels(conn: &Connection, user_id: i64) -> DbResult<HashMap<i64, StockLevel>> {
        let mut stmt = conn
            .prepare("SELECT ingredient_id, quantity, unit FROM inventory_items WHERE user_id = ?1")?;

        let levels = stmt
            .query_map([user_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    StockLevel {
                        quantity: row.get(1)?,
                        unit: row.get(2)?,
                    },
                ))
            })?
            .collect::<Result<HashMap<_, _>, _>>()?;

        Ok(levels)
    }

    /// Reduce stock, never below zero
    pub fn deduct(conn: &Connection, user_id: i64, ingredient_id: i64, amount: f64) -> DbResult<bool> {
        let rows = conn.execute(
            r#"
            UPDATE inventory_items
            SET quantity = MAX(quantity - ?3, 0.0), updated_at = datetime('now')
            WHERE user_id = ?1 AND ingredient_id = ?2
            "#,
            params![user_id, ingredient_id, amount],
        )?;
        Ok(rows > 0)
    }

    /// Returns Ok(true) if removed, Ok(false) if not found
    pub fn delete(conn: &Connection, user_id: i64, ingredient_id: i64) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM inventory_items WHERE user_id = ?1 AND ingredient_id = ?2",
            params![user_id, ingredient_id],
        )?;
        Ok(rows > 0)
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM inventory_items", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_connection;
    use crate::models::{Ingredient, User};

    fn setup() -> (Connection, i64) {
        let conn = test_connection();
        let user = User::create(&conn, "bob", "hash").unwrap();
        Ingredient::upsert(&conn, 9003, "apple", "Produce", Some("ounces")).unwrap();
        Ingredient::upsert(&conn, 1001, "butter", "Dairy", Some("teaspoons")).unwrap();
        (conn, user.id)
    }

    #[test]
    fn test_set_replaces_quantity() {
        let (conn, user_id) = setup();
        InventoryItem::set(&conn, user_id, 9003, 16.0, "ounces", Some("crisper")).unwrap();
        let item = InventoryItem::set(&conn, user_id, 9003, 4.0, "ounces", None).unwrap();

        assert_eq!(item.quantity, 4.0);
        assert_eq!(item.notes.as_deref(), Some("crisper"));
    }

    #[test]
    fn test_stock_levels_and_details() {
        let (conn, user_id) = setup();
        InventoryItem::set(&conn, user_id, 9003, 16.0, "ounces", None).unwrap();
        InventoryItem::set(&conn, user_id, 1001, 6.0, "teaspoons", None).unwrap();

        let levels = InventoryItem::stock_levels(&conn, user_id).unwrap();
        assert_eq!(levels[&9003].quantity, 16.0);
        assert_eq!(levels[&1001].unit, "teaspoons");

        let details = InventoryItem::list_details(&conn, user_id).unwrap();
        let names: Vec<&str> = details.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["butter", "apple"]);
    }

    #[test]
    fn test_deduct_clamps_at_zero() {
        let (conn, user_id) = setup();
        InventoryItem::set(&conn, user_id, 9003, 5.0, "ounces", None).unwrap();

        assert!(InventoryItem::deduct(&conn, user_id, 9003, 3.0).unwrap());
        assert_eq!(InventoryItem::get(&conn, user_id, 9003).unwrap().unwrap().quantity, 2.0);

        InventoryItem::deduct(&conn, user_id, 9003, 10.0).unwrap();
        assert_eq!(InventoryItem::get(&conn, user_id, 9003).unwrap().unwrap().quantity, 0.0);

        assert!(!InventoryItem::deduct(&conn, user_id, 1001, 1.0).unwrap());
    }

    #[test]
    fn test_unknown_ingredient_rejected() {
        let (conn, user_id) = setup();
        assert!(InventoryItem::set(&conn, user_id, 42, 1.0, "each", None).is_err());
    }
}
