//! Deadline enforcement for store calls.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::AppError;
use crate::result::AppResult;

/// Runs a fallible store operation with an upper bound on its duration.
///
/// When the deadline elapses the inner future is dropped and a
/// [`ErrorKind::Timeout`](crate::error::ErrorKind::Timeout) error is returned.
/// Callers must only pass operations that either commit as a whole or not at
/// all, so dropping them never leaves partial writes behind.
pub async fn bounded<T, F>(limit: Duration, operation: &'static str, fut: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            warn!(
                operation = operation,
                timeout_ms = limit.as_millis() as u64,
                "Store call timed out"
            );
            Err(AppError::timeout(format!(
                "{operation} timed out after {}ms",
                limit.as_millis()
            )))
        }
    }
}
