//! CMS Server: authentication core for the admin backend
//!
//! Main entry point that wires all crates together and starts the server.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use cms_api::{AppState, Repositories};
use cms_core::config::AppConfig;
use cms_core::error::AppError;
use cms_database::DatabasePool;
use cms_database::repositories::{
    PgAccessControlRepository, PgRefreshTokenRepository, PgUserRepository,
};

/// CMS backend server.
#[derive(Debug, Parser)]
#[command(name = "cms-server", version, about)]
struct Cli {
    /// Configuration overlay to load from `config/{env}.toml`.
    #[arg(long, default_value = "development")]
    env: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load(&cli.env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting CMS server");

    // ── Step 1: Database connection + migrations ─────────────────
    let db_pool = DatabasePool::connect(&config.database).await?;
    db_pool.migrate().await?;

    // ── Step 2: Repositories ─────────────────────────────────────
    let pool = db_pool.pool().clone();
    let repos = Repositories {
        users: Arc::new(PgUserRepository::new(pool.clone())),
        access: Arc::new(PgAccessControlRepository::new(pool.clone())),
        refresh_tokens: Arc::new(PgRefreshTokenRepository::new(pool)),
    };

    // ── Step 3: Auth system + router ─────────────────────────────
    let state = AppState::new(
        config.server.clone(),
        &config.auth,
        config.database.query_timeout(),
        repos,
        Some(db_pool.clone()),
    )?;
    let app = cms_api::build_router(state);

    // ── Step 4: Serve ────────────────────────────────────────────
    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    tracing::info!(address = %addr, "HTTP server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| AppError::internal(format!("HTTP server error: {e}")))?;

    tracing::info!("Shutting down");
    db_pool.close().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
