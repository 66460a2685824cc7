// handlers/public/movies.rs - read-only movie and rating endpoints

use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::validate::optional_text;
use crate::api::ApiPath;
use crate::app::AppState;
use crate::database::models::MovieFilters;
use crate::database::{movies, ratings};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

pub(crate) const MOVIE_NOT_FOUND: &str = "Filme não encontrado";

/// Query string for GET /filmes. Empty values are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "genero", alias = "genre")]
    pub genre: Option<String>,
    #[serde(rename = "diretor", alias = "director")]
    pub director: Option<String>,
    #[serde(rename = "usuario_id", alias = "user_id")]
    pub owner_id: Option<String>,
}

impl ListQuery {
    fn into_filters(self) -> Result<MovieFilters, ApiError> {
        let owner_id = match optional_text(self.owner_id) {
            Some(raw) => Some(raw.trim().parse::<i64>().map_err(|_| {
                ApiError::bad_request("usuario_id deve ser um número inteiro")
            })?),
            None => None,
        };

        Ok(MovieFilters {
            genre: optional_text(self.genre),
            director: optional_text(self.director),
            owner_id,
        })
    }
}

/// GET /filmes?genero=&diretor=&usuario_id= - newest first
pub async fn list(State(state): State<AppState>, Query(query): Query<ListQuery>) -> ApiResult<Value> {
    let filters = query.into_filters()?;
    tracing::debug!(?filters, "listing movies");

    let movies = movies::list(&state.db, &filters).await?;

    Ok(ApiResponse::success(json!({
        "total": movies.len(),
        "filmes": movies,
    })))
}

/// GET /filmes/:id - the movie with its ratings embedded
pub async fn show(State(state): State<AppState>, ApiPath(id): ApiPath<i64>) -> ApiResult<Value> {
    let movie = movies::get_with_ratings(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found(MOVIE_NOT_FOUND))?;

    Ok(ApiResponse::success(json!(movie)))
}

/// GET /filmes/:id/avaliacoes - ratings plus the live mean and count
pub async fn ratings(State(state): State<AppState>, ApiPath(id): ApiPath<i64>) -> ApiResult<Value> {
    let movie = movies::get_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found(MOVIE_NOT_FOUND))?;

    let list = ratings::list_by_movie(&state.db, id).await?;
    let aggregate = ratings::movie_aggregate(&state.db, id).await?;

    Ok(ApiResponse::success(json!({
        "filme": { "id": movie.id, "titulo": movie.title },
        "media": aggregate.mean,
        "total_avaliacoes": aggregate.count,
        "avaliacoes": list,
    })))
}
