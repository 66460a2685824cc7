// handlers/public/auth.rs - POST /auth/registrar and POST /auth/login

use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::{ApiJson, FieldErrors};
use crate::app::AppState;
use crate::database::users;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

const EMAIL_TAKEN: &str = "Usuário com este email já existe";
const INVALID_CREDENTIALS: &str = "Credenciais inválidas";

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(rename = "nome", alias = "name")]
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "senha", alias = "password")]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    #[serde(rename = "senha", alias = "password")]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginUser {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(rename = "mensagem")]
    pub message: &'static str,
    pub token: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
    #[serde(rename = "usuario")]
    pub user: LoginUser,
}

/**
 * POST /auth/registrar - create an account
 *
 * Input: `{ "nome", "email", "senha" }`, all required.
 * Output (201): `{ "mensagem", "usuario": { id, nome, email, created_at } }`
 *
 * 409 when the email is already registered, including when a concurrent
 * registration wins the race between the lookup and the insert.
 */
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> ApiResult<Value> {
    let mut errors = FieldErrors::new();
    let name = errors.required("nome", body.name);
    let email = errors.required("email", body.email);
    let password = errors.required("senha", body.password);
    errors.finish("Nome, email e senha são obrigatórios")?;

    let email = email.trim();
    if users::get_by_email(&state.db, email).await?.is_some() {
        tracing::info!("Registration rejected, email already in use: {}", email);
        return Err(ApiError::conflict(EMAIL_TAKEN));
    }

    let id = users::create(&state.db, name.trim(), email, &password, state.config.security.bcrypt_cost)
        .await
        .map_err(|e| match e {
            crate::database::DatabaseError::UniqueViolation(_) => ApiError::conflict(EMAIL_TAKEN),
            other => other.into(),
        })?;

    let user = users::get_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::internal_server_error("Erro interno do servidor"))?;

    tracing::info!(user_id = id, "user registered");
    Ok(ApiResponse::created(json!({
        "mensagem": "Usuário criado com sucesso",
        "usuario": user,
    })))
}

/**
 * POST /auth/login - exchange credentials for a bearer token
 *
 * Unknown email and wrong password produce the same 401 so the endpoint
 * does not reveal which accounts exist.
 */
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let mut errors = FieldErrors::new();
    let email = errors.required("email", body.email);
    let password = errors.required("senha", body.password);
    errors.finish("Email e senha são obrigatórios")?;

    let Some(user) = users::get_by_email(&state.db, email.trim()).await? else {
        tracing::warn!("Login failed for unknown email");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    if !users::verify_password(&password, &user.password_hash).await {
        tracing::warn!(user_id = user.id, "Login failed, wrong password");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = state.tokens.issue(user.id, &user.email)?;

    tracing::info!(user_id = user.id, "user logged in");
    Ok(ApiResponse::success(LoginResponse {
        message: "Login realizado com sucesso",
        token,
        expires_in: state.tokens.ttl_seconds(),
        user: LoginUser {
            id: user.id,
            name: user.name,
            email: user.email,
        },
    }))
}
