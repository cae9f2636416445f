//! Health check handler.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match &state.db_pool {
        None => "not_configured",
        Some(pool) => match pool.ping().await {
            Ok(()) => "connected",
            Err(e) => {
                warn!(error = %e, "Database health check failed");
                "unavailable"
            }
        },
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
    })
}
