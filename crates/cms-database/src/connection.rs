//! PostgreSQL pool for the auth tables.

use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use tracing::info;

use cms_core::config::DatabaseConfig;
use cms_core::error::{AppError, ErrorKind};
use cms_core::result::AppResult;
use cms_core::timeout::bounded;

/// Pooled connections plus the deadline applied to liveness pings.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
    ping_timeout: Duration,
}

impl DatabasePool {
    /// Opens the pool. Only host, port and database name are logged; the
    /// URL itself may carry credentials.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let options = PgConnectOptions::from_str(&config.url).map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Invalid database URL", e)
        })?;

        info!(
            host = options.get_host(),
            port = options.get_port(),
            database = options.get_database().unwrap_or("<default>"),
            max_connections = config.max_connections,
            "Opening auth store pool"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::PersistFailed, "Auth store unreachable", e)
            })?;

        Ok(Self {
            pool,
            ping_timeout: config.query_timeout(),
        })
    }

    /// The underlying sqlx pool, for the Postgres repositories.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates or upgrades the `users`, RBAC and `refresh_tokens` tables.
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::PersistFailed, "Schema migration failed", e)
            })?;
        info!("Auth schema up to date");
        Ok(())
    }

    /// Round-trips a trivial query within the store deadline.
    pub async fn ping(&self) -> AppResult<()> {
        bounded(self.ping_timeout, "database.ping", async {
            sqlx::query("SELECT 1")
                .execute(&self.pool)
                .await
                .map(|_| ())
                .map_err(|e| AppError::with_source(ErrorKind::PersistFailed, "Ping failed", e))
        })
        .await
    }

    /// Drains and closes every connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
