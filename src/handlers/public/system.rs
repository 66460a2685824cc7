// handlers/public/system.rs - GET / and GET /health

use axum::extract::State;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// GET / - welcome message and endpoint summary
pub async fn root() -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "mensagem": "Bem-vindo à API de Filmes",
        "versao": env!("CARGO_PKG_VERSION"),
        "documentacao": {
            "auth": "POST /auth/registrar, POST /auth/login (public)",
            "usuarios": "GET /usuarios (public), GET /usuarios/perfil, PUT|DELETE /usuarios/:id (protected)",
            "filmes": "GET /filmes, GET /filmes/:id (public), POST /filmes, PUT|DELETE /filmes/:id (protected)",
            "avaliacoes": "GET /filmes/:id/avaliacoes (public), POST /filmes/:id/avaliar (protected)",
            "health": "GET /health (public)",
        }
    })))
}

/// GET /health - liveness plus a database ping
pub async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    if let Err(e) = state.db.health_check().await {
        tracing::error!("Health check failed: {}", e);
        return Err(ApiError::service_unavailable("Banco de dados indisponível"));
    }

    Ok(ApiResponse::success(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
        "database": "ok",
    })))
}
