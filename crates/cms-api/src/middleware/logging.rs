//! Request/response logging middleware.

use std::time::Instant;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::{info, warn};

use crate::extractors::ClientIp;
use crate::state::AppState;

/// Logs method, path, client address, status, and duration of every
/// request. Server errors are logged at `warn`.
pub async fn request_logging(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let client = ClientIp::resolve(
        request.headers(),
        request
            .extensions()
            .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
            .map(|info| info.0),
        state.server.trust_proxy_headers,
    );
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let duration_ms = start.elapsed().as_millis() as u64;

    if response.status().is_server_error() {
        warn!(method = %method, path = %path, ip = %client.0, status, duration_ms, "HTTP request failed");
    } else {
        info!(method = %method, path = %path, ip = %client.0, status, duration_ms, "HTTP request");
    }

    response
}
