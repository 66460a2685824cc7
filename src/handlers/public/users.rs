// handlers/public/users.rs - GET /usuarios

use axum::extract::State;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::users;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /usuarios - every user, public fields only
pub async fn list(State(state): State<AppState>) -> ApiResult<Value> {
    let users = users::list(&state.db).await?;

    Ok(ApiResponse::success(json!({
        "total": users.len(),
        "usuarios": users,
    })))
}
