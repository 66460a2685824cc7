//! Fixtures shared by the in-crate unit tests.

use crate::database::models::MovieChanges;
use crate::database::{users, Database};

/// Lowest cost bcrypt accepts; keeps hashing fast in tests.
pub const TEST_BCRYPT_COST: u32 = 4;

/// Fresh, migrated in-memory database.
pub async fn test_db() -> Database {
    let db = Database::in_memory().await.expect("in-memory database");
    db.migrate().await.expect("migrations");
    db
}

pub async fn seed_user(db: &Database, name: &str, email: &str) -> i64 {
    users::create(db, name, email, "senha123", TEST_BCRYPT_COST)
        .await
        .expect("seed user")
}

pub fn movie_changes(title: &str, director: &str, genre: Option<&str>) -> MovieChanges {
    MovieChanges {
        title: title.to_string(),
        description: Some("Descrição".to_string()),
        director: director.to_string(),
        release_year: Some(2021),
        genre: genre.map(str::to_string),
    }
}
