use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

use super::rating::Rating;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Movie {
    pub id: i64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "diretor")]
    pub director: String,
    #[serde(rename = "ano_lancamento")]
    pub release_year: Option<i64>,
    #[serde(rename = "genero")]
    pub genre: Option<String>,
    /// Cached mean of the movie's rating scores.
    #[serde(rename = "classificacao")]
    pub rating: f64,
    #[serde(rename = "usuario_id")]
    pub user_id: i64,
    #[serde(rename = "usuario_nome")]
    pub owner_name: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct MovieWithRatings {
    #[serde(flatten)]
    pub movie: Movie,
    #[serde(rename = "avaliacoes")]
    pub ratings: Vec<Rating>,
}

/// The five mutable fields of a movie, used for both create and update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieChanges {
    pub title: String,
    pub description: Option<String>,
    pub director: String,
    pub release_year: Option<i64>,
    pub genre: Option<String>,
}

/// Optional listing filters, combined with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieFilters {
    /// Exact match.
    pub genre: Option<String>,
    /// Case-sensitive substring match.
    pub director: Option<String>,
    pub owner_id: Option<i64>,
}
