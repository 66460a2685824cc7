use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Rating {
    pub id: i64,
    #[serde(rename = "filme_id")]
    pub movie_id: i64,
    #[serde(rename = "usuario_id")]
    pub user_id: i64,
    #[serde(rename = "nota")]
    pub score: f64,
    #[serde(rename = "comentario")]
    pub comment: Option<String>,
    #[serde(rename = "usuario_nome")]
    pub rater_name: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, FromRow)]
pub struct RatingAggregate {
    #[serde(rename = "media")]
    pub mean: f64,
    #[serde(rename = "total")]
    pub count: i64,
}
