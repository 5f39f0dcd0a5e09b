//! Utility to reset the user table with the demo accounts

use pantry::auth::{hash_password, AuthError};
use pantry::config;
use pantry::models::User;

const DEMO_USERS: [&str; 3] = ["bob", "sally", "tom"];
const DEMO_PASSWORD: &str = "123";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let db_path = config::database_path();
    println!("Database path: {}", db_path.display());
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = pantry::db::Database::new(&db_path)?;

    database.with_conn(|conn| {
        pantry::db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    let accounts = DEMO_USERS
        .iter()
        .map(|&username| Ok((username, hash_password(DEMO_PASSWORD)?)))
        .collect::<Result<Vec<_>, AuthError>>()?;

    database.with_conn(|conn| {
        let removed = User::delete_all(conn)?;
        println!("Removed {} existing users", removed);

        for (username, hash) in &accounts {
            let user = User::create(conn, username, hash)?;
            println!("  Created {} (id {})", user.username, user.id);
        }
        Ok(())
    })?;

    Ok(())
}
