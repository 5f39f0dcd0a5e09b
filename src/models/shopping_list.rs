//! Shopping list model
//!
//! A persisted shopping plan: the recipes it was built from and one row per
//! aggregated ingredient.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use crate::shopping::{PlanLine, ShoppingPlan};
use crate::units::base_unit_for;
use super::Ingredient;

/// Availability of a shopping list row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    InStock,
    Missing,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::InStock => "in_stock",
            ItemStatus::Missing => "missing",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "in_stock" => ItemStatus::InStock,
            _ => ItemStatus::Missing,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingList {
    pub id: i64,
    pub user_id: i64,
    pub notes: Option<String>,
    pub created_at: String,
}

/// One ingredient row of a shopping list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    pub ingredient_id: i64,
    pub name: String,
    pub aisle: String,
    pub quantity_needed: f64,
    pub quantity_on_hand: f64,
    pub quantity_to_buy: f64,
    pub unit: String,
    pub status: ItemStatus,
    pub unit_conflict: bool,
    pub is_purchased: bool,
}

/// List summary for listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingListSummary {
    pub id: i64,
    pub created_at: String,
    pub notes: Option<String>,
    pub recipe_count: i64,
    pub missing_count: i64,
    pub purchased_count: i64,
}

impl ShoppingList {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Persist a plan as a new list, with its ingredients, in one transaction
    pub fn create_from_plan(
        conn: &mut Connection,
        user_id: i64,
        recipe_ids: &[i64],
        plan: &ShoppingPlan,
        notes: Option<&str>,
    ) -> DbResult<Self> {
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO shopping_lists (user_id, notes) VALUES (?1, ?2)",
            params![user_id, notes],
        )?;
        let list_id = tx.last_insert_rowid();

        for (position, recipe_id) in recipe_ids.iter().enumerate() {
            tx.execute(
                "INSERT INTO shopping_list_recipes (shopping_list_id, recipe_id, position) VALUES (?1, ?2, ?3)",
                params![list_id, recipe_id, position as i64],
            )?;
        }

        for (status, lines) in [
            (ItemStatus::InStock, &plan.in_inventory),
            (ItemStatus::Missing, &plan.missing),
        ] {
            for line in lines {
                insert_item(&tx, list_id, line, status)?;
            }
        }

        tx.commit()?;

        Self::get_by_id(conn, list_id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM shopping_lists WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(list) => Ok(Some(list)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Recipe ids the list was generated from, in original order
    pub fn get_recipe_ids(conn: &Connection, id: i64) -> DbResult<Vec<i64>> {
        let mut stmt = conn.prepare(
            "SELECT recipe_id FROM shopping_list_recipes WHERE shopping_list_id = ?1 ORDER BY position",
        )?;

        let ids = stmt
            .query_map([id], |row| row.get(0))?
            .collect::<Result<Vec<i64>, _>>()?;

        Ok(ids)
    }

    /// Items grouped by aisle, then name
    pub fn get_items(conn: &Connection, id: i64) -> DbResult<Vec<ShoppingListItem>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT sli.ingredient_id, i.name, i.aisle,
                   sli.quantity_needed, sli.quantity_on_hand, sli.quantity_to_buy,
                   sli.unit, sli.status, sli.unit_conflict, sli.is_purchased
            FROM shopping_list_ingredients sli
            INNER JOIN ingredients i ON i.id = sli.ingredient_id
            WHERE sli.shopping_list_id = ?1
            ORDER BY i.aisle ASC, i.name ASC
            "#,
        )?;

        let items = stmt
            .query_map([id], |row| {
                Ok(ShoppingListItem {
                    ingredient_id: row.get(0)?,
                    name: row.get(1)?,
                    aisle: row.get(2)?,
                    quantity_needed: row.get(3)?,
                    quantity_on_hand: row.get(4)?,
                    quantity_to_buy: row.get(5)?,
                    unit: row.get(6)?,
                    status: ItemStatus::from_str(row.get::<_, String>(7)?.as_str()),
                    unit_conflict: row.get::<_, i32>(8)? != 0,
                    is_purchased: row.get::<_, i32>(9)? != 0,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// A user's lists, newest first
    pub fn list_for_user(conn: &Connection, user_id: i64) -> DbResult<Vec<ShoppingListSummary>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT sl.id, sl.created_at, sl.notes,
                   (SELECT COUNT(*) FROM shopping_list_recipes r WHERE r.shopping_list_id = sl.id),
                   (SELECT COUNT(*) FROM shopping_list_ingredients i
                        WHERE i.shopping_list_id = sl.id AND i.status = 'missing'),
                   (SELECT COUNT(*) FROM shopping_list_ingredients i
                        WHERE i.shopping_list_id = sl.id AND i.is_purchased = 1)
            FROM shopping_lists sl
            WHERE sl.user_id = ?1
            ORDER BY sl.id DESC
            "#,
        )?;

        let lists = stmt
            .query_map([user_id], |row| {
                Ok(ShoppingListSummary {
                    id: row.get(0)?,
                    created_at: row.get(1)?,
                    notes: row.get(2)?,
                    recipe_count: row.get(3)?,
                    missing_count: row.get(4)?,
                    purchased_count: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(lists)
    }

    /// Check or uncheck an item; Ok(false) if the item is not on the list
    pub fn set_purchased(conn: &Connection, id: i64, ingredient_id: i64, purchased: bool) -> DbResult<bool> {
        let rows = conn.execute(
            "UPDATE shopping_list_ingredients SET is_purchased = ?3 WHERE shopping_list_id = ?1 AND ingredient_id = ?2",
            params![id, ingredient_id, purchased as i32],
        )?;
        Ok(rows > 0)
    }

    /// Returns Ok(true) if deleted, Ok(false) if not found
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM shopping_lists WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM shopping_lists", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn insert_item(conn: &Connection, list_id: i64, line: &PlanLine, status: ItemStatus) -> DbResult<()> {
    Ingredient::upsert(
        conn,
        line.ingredient_id,
        &line.name,
        &line.aisle,
        base_unit_for(&line.unit),
    )?;

    conn.execute(
        r#"
        INSERT INTO shopping_list_ingredients (
            shopping_list_id, ingredient_id, quantity_needed, quantity_on_hand,
            quantity_to_buy, unit, status, unit_conflict
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
        params![
            list_id,
            line.ingredient_id,
            line.needed,
            line.on_hand,
            line.to_buy,
            line.unit,
            status.as_str(),
            line.unit_conflict as i32,
        ],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_connection;
    use crate::models::User;

    fn plan_line(id: i64, name: &str, aisle: &str, needed: f64, on_hand: f64) -> PlanLine {
        PlanLine {
            ingredient_id: id,
            name: name.to_string(),
            aisle: aisle.to_string(),
            unit: "ounces".to_string(),
            needed,
            on_hand,
            to_buy: (needed - on_hand).max(0.0),
            unit_conflict: false,
        }
    }

    #[test]
    fn test_create_from_plan_round_trip() {
        let mut conn = test_connection();
        let user = User::create(&conn, "bob", "hash").unwrap();

        let plan = ShoppingPlan {
            in_inventory: vec![plan_line(9040, "banana", "Produce", 3.0, 5.0)],
            missing: vec![plan_line(9003, "apple", "Produce", 16.0, 4.0)],
        };

        let list = ShoppingList::create_from_plan(&mut conn, user.id, &[7, 7, 3], &plan, Some("weekend")).unwrap();
        assert_eq!(list.user_id, user.id);
        assert_eq!(ShoppingList::get_recipe_ids(&conn, list.id).unwrap(), vec![7, 7, 3]);

        let items = ShoppingList::get_items(&conn, list.id).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "apple");
        assert_eq!(items[0].status, ItemStatus::Missing);
        assert_eq!(items[0].quantity_to_buy, 12.0);
        assert_eq!(items[1].status, ItemStatus::InStock);

        let ingredient = Ingredient::get_by_id(&conn, 9003).unwrap().unwrap();
        assert_eq!(ingredient.base_unit.as_deref(), Some("ounces"));

        assert!(ShoppingList::set_purchased(&conn, list.id, 9003, true).unwrap());
        assert!(!ShoppingList::set_purchased(&conn, list.id, 1, true).unwrap());

        let summaries = ShoppingList::list_for_user(&conn, user.id).unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].recipe_count, 3);
        assert_eq!(summaries[0].missing_count, 1);
        assert_eq!(summaries[0].purchased_count, 1);

        assert!(ShoppingList::delete(&conn, list.id).unwrap());
        assert!(ShoppingList::get_items(&conn, list.id).unwrap().is_empty());
    }
}
