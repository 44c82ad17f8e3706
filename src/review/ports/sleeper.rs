//! Injectable blocking wait.

use async_trait::async_trait;
use std::time::Duration;

/// Suspends the run for a bounded duration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Waits for `duration`.
    async fn sleep(&self, duration: Duration);
}
