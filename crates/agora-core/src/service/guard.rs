//! Per-operation time bound for repository calls.

use std::future::Future;
use std::time::Duration;

use agora_types::error::{EngagementError, RepositoryError};

/// Run a repository future under the configured time bound.
///
/// Elapsing the bound is a storage failure: the caller gets an error instead
/// of a hung request. `what` names the operation for the error message and
/// the log line. Retrying is left to callers.
pub(crate) async fn bounded<F, T>(
    limit: Duration,
    what: &'static str,
    fut: F,
) -> Result<T, EngagementError>
where
    F: Future<Output = Result<T, RepositoryError>> + Send,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(EngagementError::Storage(e.to_string())),
        Err(_) => {
            tracing::warn!(
                operation = what,
                timeout_ms = limit.as_millis() as u64,
                "storage operation timed out"
            );
            Err(EngagementError::Storage(format!(
                "{what} timed out after {}ms",
                limit.as_millis()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bounded_passes_through_ok() {
        let result = bounded(Duration::from_secs(1), "noop", async { Ok(42u32) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_bounded_maps_repository_error() {
        let result: Result<u32, _> = bounded(Duration::from_secs(1), "noop", async {
            Err(RepositoryError::Connection)
        })
        .await;
        match result {
            Err(EngagementError::Storage(msg)) => {
                assert!(msg.contains("database connection error"))
            }
            other => panic!("expected storage error, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_times_out_stalled_future() {
        let result: Result<u32, _> = bounded(Duration::from_millis(50), "stalled read", async {
            std::future::pending().await
        })
        .await;
        match result {
            Err(EngagementError::Storage(msg)) => {
                assert!(msg.contains("stalled read"));
                assert!(msg.contains("timed out"));
            }
            other => panic!("expected storage error, got {other:?}"),
        }
    }
}
