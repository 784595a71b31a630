//! Per-attempt deadline enforcement.
//!
//! # Responsibilities
//! - Bound each upstream attempt with an independent deadline
//! - Surface expiry as a distinct, retryable failure
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities; expiry drops the in-flight future,
//!   cancelling only that attempt's I/O
//! - Deadlines never carry over or accumulate across attempts

use std::future::Future;
use std::time::Duration;
use tokio::time::error::Elapsed;

/// Run `operation` under an independent deadline.
pub async fn deadline<F: Future>(limit: Duration, operation: F) -> Result<F::Output, Elapsed> {
    tokio::time::timeout(limit, operation).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deadline_expires_slow_operations() {
        let result = deadline(Duration::from_millis(10), std::future::pending::<()>()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_deadline_passes_fast_operations_through() {
        let result = deadline(Duration::from_secs(1), async { 7 }).await;
        assert_eq!(result.unwrap(), 7);
    }
}
