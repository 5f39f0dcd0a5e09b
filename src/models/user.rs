//! User model

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: String,
}

impl User {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            username: row.get("username")?,
            password_hash: row.get("password_hash")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Insert a new user; the password must already be hashed
    pub fn create(conn: &Connection, username: &str, password_hash: &str) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO users (username, password_hash) VALUES (?1, ?2)",
            params![username, password_hash],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM users WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_by_username(conn: &Connection, username: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM users WHERE username = ?1")?;

        match stmt.query_row([username], Self::from_row) {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Delete every user (cascades to their recipes, inventory and lists)
    pub fn delete_all(conn: &Connection) -> DbResult<usize> {
        Ok(conn.execute("DELETE FROM users", [])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_connection;

    fn conn() -> Connection {
        test_connection()
    }

    #[test]
    fn test_create_and_lookup() {
        let conn = conn();
        let user = User::create(&conn, "bob", "hash").unwrap();

        assert_eq!(user.username, "bob");
        assert_eq!(User::get_by_username(&conn, "bob").unwrap().unwrap().id, user.id);
        assert!(User::get_by_username(&conn, "sally").unwrap().is_none());
        assert_eq!(User::count(&conn).unwrap(), 1);
    }

    #[test]
    fn test_duplicate_username_fails() {
        let conn = conn();
        User::create(&conn, "bob", "hash").unwrap();
        assert!(User::create(&conn, "bob", "other").is_err());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let conn = conn();
        let user = User::create(&conn, "bob", "secret-hash").unwrap();
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
    }
}
