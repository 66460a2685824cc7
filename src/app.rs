//! Router assembly and shared state.

use axum::{
    http::{HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::TokenService;
use crate::config::AppConfig;
use crate::database::Database;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;

/// State handed to every handler and to the auth gate.
#[derive(Clone, Debug)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(db: Database, config: AppConfig) -> Self {
        let tokens = TokenService::from_config(&config.security);

        Self {
            db,
            config: Arc::new(config),
            tokens: Arc::new(tokens),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::system::root))
        .route("/health", get(public::system::health))
        .route("/auth/registrar", post(public::auth::register))
        .route("/auth/login", post(public::auth::login))
        .route("/usuarios", get(public::users::list))
        .route("/filmes", get(public::movies::list))
        .route("/filmes/:id", get(public::movies::show))
        .route("/filmes/:id/avaliacoes", get(public::movies::ratings))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/usuarios/perfil", get(protected::users::profile))
        .route(
            "/usuarios/:id",
            put(protected::users::update).delete(protected::users::delete),
        )
        .route("/filmes", post(protected::movies::create))
        .route(
            "/filmes/:id",
            put(protected::movies::update).delete(protected::movies::delete),
        )
        .route("/filmes/:id/avaliar", post(protected::movies::rate))
        .route_layer(from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    if config.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}
