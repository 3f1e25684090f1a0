//! Deadline guard for outbound calls
//!
//! Wraps a single upstream attempt with a deadline. On expiry the
//! in-flight future is dropped, which tears down the underlying
//! connection, so a slow upstream cannot leak sockets. The guard never
//! retries; a timeout surfaces as a provider failure for the router to
//! handle like any other.

use std::future::Future;
use std::time::Duration;

use crate::domain::error::GatewayError;

pub async fn deadline<T, F>(limit: Duration, operation: F) -> Result<T, GatewayError>
where
    F: Future<Output = Result<T, GatewayError>>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => Err(GatewayError::Timeout {
            limit_millis: limit.as_millis() as u64,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fast_operation_passes_through() {
        let result = deadline(Duration::from_millis(200), async { Ok(7u32) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_inner_error_passes_through() {
        let result: Result<u32, _> = deadline(Duration::from_millis(200), async {
            Err(GatewayError::RateLimited)
        })
        .await;
        assert!(matches!(result, Err(GatewayError::RateLimited)));
    }

    #[tokio::test]
    async fn test_slow_operation_times_out() {
        let result: Result<u32, _> = deadline(Duration::from_millis(20), async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(7u32)
        })
        .await;
        match result {
            Err(GatewayError::Timeout { limit_millis }) => assert_eq!(limit_millis, 20),
            other => panic!("expected timeout, got {other:?}"),
        }
    }
}
