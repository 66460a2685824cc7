// handlers/protected/movies.rs - movie writes and rating submission

use axum::{extract::State, Extension};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::validate::optional_text;
use crate::api::{validate_score, ApiJson, ApiPath, FieldErrors};
use crate::app::AppState;
use crate::database::models::{Movie, MovieChanges};
use crate::database::{movies, ratings};
use crate::error::ApiError;
use crate::handlers::public::movies::MOVIE_NOT_FOUND;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// Body of POST /filmes and PUT /filmes/:id.
#[derive(Debug, Default, Deserialize)]
pub struct MovieRequest {
    #[serde(rename = "titulo", alias = "title")]
    pub title: Option<String>,
    #[serde(rename = "descricao", alias = "description")]
    pub description: Option<String>,
    #[serde(rename = "diretor", alias = "director")]
    pub director: Option<String>,
    #[serde(rename = "ano_lancamento", alias = "year")]
    pub release_year: Option<i64>,
    #[serde(rename = "genero", alias = "genre")]
    pub genre: Option<String>,
}

impl MovieRequest {
    fn into_changes(self) -> Result<MovieChanges, ApiError> {
        let mut errors = FieldErrors::new();
        let title = errors.required("titulo", self.title);
        let director = errors.required("diretor", self.director);
        errors.finish("Título e diretor são obrigatórios")?;

        Ok(MovieChanges {
            title: title.trim().to_string(),
            description: optional_text(self.description),
            director: director.trim().to_string(),
            release_year: self.release_year,
            genre: optional_text(self.genre),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RateRequest {
    /// Kept raw so a non-numeric score is a validation error, not a JSON error.
    #[serde(default, rename = "nota", alias = "score")]
    pub score: Option<Value>,
    #[serde(rename = "comentario", alias = "comment")]
    pub comment: Option<String>,
}

/// Existing movie owned by the caller; 404 before 403.
async fn owned_movie(state: &AppState, id: i64, auth: &AuthUser, action: &str) -> Result<Movie, ApiError> {
    let movie = movies::get_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found(MOVIE_NOT_FOUND))?;

    if movie.user_id != auth.id {
        tracing::warn!(caller = auth.id, movie_id = id, owner = movie.user_id, "movie {} forbidden", action);
        return Err(ApiError::forbidden(format!(
            "Você não tem permissão para {} este filme",
            action
        )));
    }

    Ok(movie)
}

/// POST /filmes - the caller becomes the owner
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiJson(body): ApiJson<MovieRequest>,
) -> ApiResult<Value> {
    let changes = body.into_changes()?;

    let id = movies::create(&state.db, &changes, auth.id).await?;
    let movie = movies::get_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::internal_server_error("Erro interno do servidor"))?;

    tracing::info!(movie_id = id, owner = auth.id, "movie created");
    Ok(ApiResponse::created(json!({
        "mensagem": "Filme criado com sucesso",
        "filme": movie,
    })))
}

/// PUT /filmes/:id - full overwrite of the mutable fields, owner only
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<MovieRequest>,
) -> ApiResult<Value> {
    let changes = body.into_changes()?;
    owned_movie(&state, id, &auth, "atualizar").await?;

    movies::update(&state.db, id, &changes).await?;
    let movie = movies::get_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found(MOVIE_NOT_FOUND))?;

    tracing::info!(movie_id = id, "movie updated");
    Ok(ApiResponse::success(json!({
        "mensagem": "Filme atualizado com sucesso",
        "filme": movie,
    })))
}

/// DELETE /filmes/:id - owner only; ratings cascade
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Value> {
    owned_movie(&state, id, &auth, "deletar").await?;

    movies::delete(&state.db, id).await?;

    tracing::info!(movie_id = id, "movie deleted");
    Ok(ApiResponse::success(json!({ "mensagem": "Filme deletado com sucesso" })))
}

/**
 * POST /filmes/:id/avaliar - create or replace the caller's rating
 *
 * Input: `{ "nota": 0..=10, "comentario"?: string }`
 * Output (201): `{ "mensagem", "avaliacao", "media", "total_avaliacoes" }`
 *
 * The score is checked before the database is touched. The rating write is a
 * single upsert keyed on (movie, caller); the cached mean on the movie is
 * recomputed right after it, outside the write.
 */
pub async fn rate(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<RateRequest>,
) -> ApiResult<Value> {
    let score = validate_score(body.score.as_ref())?;
    let comment = body.comment.unwrap_or_default();

    if movies::get_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::not_found(MOVIE_NOT_FOUND));
    }

    let rating_id = ratings::upsert(&state.db, id, auth.id, score, &comment).await?;
    let aggregate = movies::recompute_rating(&state.db, id).await?;
    let rating = ratings::get_by_id(&state.db, rating_id)
        .await?
        .ok_or_else(|| ApiError::internal_server_error("Erro interno do servidor"))?;

    tracing::info!(movie_id = id, rating_id, score, "rating recorded");
    Ok(ApiResponse::created(json!({
        "mensagem": "Avaliação registrada com sucesso",
        "avaliacao": rating,
        "media": aggregate.mean,
        "total_avaliacoes": aggregate.count,
    })))
}
