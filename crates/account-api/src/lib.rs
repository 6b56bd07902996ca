pub mod auth;
pub mod error;
pub mod middleware;
pub mod profile;
pub mod token;

use axum::{
    Json, Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

use account_types::api::HealthResponse;

use crate::auth::AppState;
use crate::middleware::require_auth;

/// All `/api` routes. Transport layers (CORS, tracing) are added by the
/// binary.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/health", get(health));

    let protected_routes = Router::new()
        .route("/api/profile", get(profile::get_profile))
        .layer(from_fn_with_state(state.clone(), require_auth));

    public_routes.merge(protected_routes).with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
