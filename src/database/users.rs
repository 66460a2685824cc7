use crate::database::manager::{Database, DatabaseError};
use crate::database::models::{PublicUser, User};

const PUBLIC_COLUMNS: &str = "id, name, email, created_at";

/// Hash `password` with bcrypt and insert a new user. Returns the new id.
///
/// A duplicate email surfaces as `DatabaseError::UniqueViolation`.
pub async fn create(
    db: &Database,
    name: &str,
    email: &str,
    password: &str,
    bcrypt_cost: u32,
) -> Result<i64, DatabaseError> {
    let password_hash = hash_password(password, bcrypt_cost).await?;

    let result = sqlx::query("INSERT INTO users (name, email, password_hash) VALUES (?, ?, ?)")
        .bind(name)
        .bind(email)
        .bind(&password_hash)
        .execute(db.pool())
        .await?;

    Ok(result.last_insert_rowid())
}

/// Full record including the password hash.
pub async fn get_by_email(db: &Database, email: &str) -> Result<Option<User>, DatabaseError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, password_hash, created_at, updated_at FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(db.pool())
    .await?;

    Ok(user)
}

pub async fn get_by_id(db: &Database, id: i64) -> Result<Option<PublicUser>, DatabaseError> {
    let user = sqlx::query_as::<_, PublicUser>(&format!(
        "SELECT {PUBLIC_COLUMNS} FROM users WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(db.pool())
    .await?;

    Ok(user)
}

pub async fn list(db: &Database) -> Result<Vec<PublicUser>, DatabaseError> {
    let users = sqlx::query_as::<_, PublicUser>(&format!(
        "SELECT {PUBLIC_COLUMNS} FROM users ORDER BY id"
    ))
    .fetch_all(db.pool())
    .await?;

    Ok(users)
}

/// Overwrite name and email. Returns false when no row matched.
pub async fn update(db: &Database, id: i64, name: &str, email: &str) -> Result<bool, DatabaseError> {
    let result = sqlx::query(
        "UPDATE users SET name = ?, email = ?, updated_at = strftime('%Y-%m-%d %H:%M:%f', 'now') WHERE id = ?",
    )
    .bind(name)
    .bind(email)
    .bind(id)
    .execute(db.pool())
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Hard delete. Owned movies and every dependent rating go with it.
pub async fn delete(db: &Database, id: i64) -> Result<bool, DatabaseError> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(db.pool())
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Check a plaintext password against a stored bcrypt hash.
///
/// Malformed hashes verify as false.
pub async fn verify_password(password: &str, password_hash: &str) -> bool {
    let password = password.to_string();
    let password_hash = password_hash.to_string();

    match tokio::task::spawn_blocking(move || bcrypt::verify(password, &password_hash)).await {
        Ok(Ok(valid)) => valid,
        Ok(Err(e)) => {
            tracing::warn!("Password verification failed: {}", e);
            false
        }
        Err(e) => {
            tracing::error!("Password verification task failed: {}", e);
            false
        }
    }
}

async fn hash_password(password: &str, cost: u32) -> Result<String, DatabaseError> {
    let password = password.to_string();

    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| DatabaseError::PasswordHash(e.to_string()))?
        .map_err(|e| DatabaseError::PasswordHash(e.to_string()))
}
