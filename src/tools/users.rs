//! User Tools
//!
//! Registration and login. Passwords are stored as Argon2 hashes.

use rusqlite::Connection;
use serde::Serialize;

use crate::auth::{hash_password, verify_password};
use crate::db::Database;
use crate::models::User;

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 3;

const INVALID_LOGIN: &str = "Invalid username or password";

/// Response for register_user and login
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user_id: i64,
    pub username: String,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
            created_at: user.created_at,
        }
    }
}

/// Register a new user
pub fn register_user(db: &Database, username: &str, password: &str) -> Result<UserResponse, String> {
    let username = username.trim();
    if username.is_empty() {
        return Err("Username cannot be empty".to_string());
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        ));
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let existing = User::get_by_username(&conn, username)
        .map_err(|e| format!("Failed to look up user: {}", e))?;
    if existing.is_some() {
        return Err(format!("Username '{}' is already taken", username));
    }

    let hash = hash_password(password).map_err(|e| e.to_string())?;
    let user = User::create(&conn, username, &hash)
        .map_err(|e| format!("Failed to create user: {}", e))?;

    tracing::info!(user_id = user.id, "Registered user");
    Ok(user.into())
}

/// Check credentials and return the user
pub fn login(db: &Database, username: &str, password: &str) -> Result<UserResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let user = User::get_by_username(&conn, username.trim())
        .map_err(|e| format!("Failed to look up user: {}", e))?
        .ok_or_else(|| INVALID_LOGIN.to_string())?;

    if !verify_password(password, &user.password_hash) {
        return Err(INVALID_LOGIN.to_string());
    }

    Ok(user.into())
}

/// Fail with a readable message if the user does not exist
pub(crate) fn require_user(conn: &Connection, user_id: i64) -> Result<User, String> {
    User::get_by_id(conn, user_id)
        .map_err(|e| format!("Failed to look up user: {}", e))?
        .ok_or_else(|| format!("User {} not found", user_id))
}
