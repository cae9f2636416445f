//! Route definitions for the CMS HTTP API.
//!
//! All routes are mounted under `/api`.

use std::time::Duration;

use axum::http::{HeaderValue, Method, header};
use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use cms_entity::permission::PermissionKey;

use crate::handlers;
use crate::middleware::{self, PermissionGuard};
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(user_routes(&state))
        .merge(health_routes());

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Login, refresh, identity, password change
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/refresh-token", post(handlers::auth::refresh))
        .route("/auth/me", get(handlers::auth::me))
        .route("/auth/password", put(handlers::auth::change_password))
}

/// Permission-guarded user administration
fn user_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/users/{id}/permissions",
            get(handlers::user::get_permissions),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            PermissionGuard::new(state.clone(), [PermissionKey::new("users", "read")]),
            middleware::require_permissions,
        ))
}

/// Health check (no auth required)
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

fn build_cors_layer(state: &AppState) -> CorsLayer {
    let origins = &state.server.allowed_origins;

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    if origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(origins)
    }
}
