//! Sleeper backed by the tokio timer.

use async_trait::async_trait;
use std::time::Duration;

use crate::review::ports::Sleeper;

/// Sleeps on the tokio runtime clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
