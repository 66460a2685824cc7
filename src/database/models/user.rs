use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

/// Full user row, password hash included. Never serialized with the hash.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Public-safe projection of a user.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct PublicUser {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    pub created_at: NaiveDateTime,
}
