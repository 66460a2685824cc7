// handlers/protected/users.rs - the caller's own account

use axum::{extract::State, Extension};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::{ApiJson, ApiPath, FieldErrors};
use crate::app::AppState;
use crate::database::{users, DatabaseError};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

const USER_NOT_FOUND: &str = "Usuário não encontrado";
const EMAIL_TAKEN: &str = "Usuário com este email já existe";

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(rename = "nome", alias = "name")]
    pub name: Option<String>,
    pub email: Option<String>,
}

/// GET /usuarios/perfil
pub async fn profile(State(state): State<AppState>, Extension(auth): Extension<AuthUser>) -> ApiResult<Value> {
    // A valid token can outlive its account.
    let user = users::get_by_id(&state.db, auth.id)
        .await?
        .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))?;

    Ok(ApiResponse::success(json!(user)))
}

/// PUT /usuarios/:id - overwrite name and email of the caller's account
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<UpdateUserRequest>,
) -> ApiResult<Value> {
    let mut errors = FieldErrors::new();
    let name = errors.required("nome", body.name);
    let email = errors.required("email", body.email);
    errors.finish("Nome e email são obrigatórios")?;

    if users::get_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::not_found(USER_NOT_FOUND));
    }
    if auth.id != id {
        tracing::warn!(caller = auth.id, target = id, "user update forbidden");
        return Err(ApiError::forbidden("Você não tem permissão para atualizar este usuário"));
    }

    let email = email.trim();
    if let Some(other) = users::get_by_email(&state.db, email).await? {
        if other.id != id {
            return Err(ApiError::conflict(EMAIL_TAKEN));
        }
    }

    users::update(&state.db, id, name.trim(), email).await.map_err(|e| match e {
        DatabaseError::UniqueViolation(_) => ApiError::conflict(EMAIL_TAKEN),
        other => other.into(),
    })?;

    let user = users::get_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))?;

    tracing::info!(user_id = id, "user updated");
    Ok(ApiResponse::success(json!({
        "mensagem": "Usuário atualizado com sucesso",
        "usuario": user,
    })))
}

/// DELETE /usuarios/:id - removes the account, its movies and every rating tied to either
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Value> {
    if users::get_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::not_found(USER_NOT_FOUND));
    }
    if auth.id != id {
        tracing::warn!(caller = auth.id, target = id, "user delete forbidden");
        return Err(ApiError::forbidden("Você não tem permissão para deletar este usuário"));
    }

    users::delete(&state.db, id).await?;

    tracing::info!(user_id = id, "user deleted");
    Ok(ApiResponse::success(json!({ "mensagem": "Usuário deletado com sucesso" })))
}
