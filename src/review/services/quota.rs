//! Quota-aware pacing of tracker calls.

use mockable::Clock;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::review::ports::{IssueTracker, Sleeper, TrackerError, TrackerResult};

/// Timing bounds applied by [`RateLimitGate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Extra wait added after the reported reset time.
    pub safety_margin: Duration,
    /// Longest acceptable quota wait.
    pub max_wait: Duration,
    /// Pause before the single retry of an overloaded call.
    pub overload_backoff: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            safety_margin: Duration::from_secs(5),
            max_wait: Duration::from_secs(3600),
            overload_backoff: Duration::from_secs(60),
        }
    }
}

/// Blocks tracker work while the quota is exhausted.
#[derive(Clone)]
pub struct RateLimitGate {
    clock: Arc<dyn Clock + Send + Sync>,
    sleeper: Arc<dyn Sleeper>,
    policy: RateLimitPolicy,
}

impl RateLimitGate {
    /// Creates a gate.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock + Send + Sync>,
        sleeper: Arc<dyn Sleeper>,
        policy: RateLimitPolicy,
    ) -> Self {
        Self {
            clock,
            sleeper,
            policy,
        }
    }

    /// Returns the configured policy.
    #[must_use]
    pub const fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    /// Waits until the tracker reports quota left.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::QuotaWaitExceeded`] when the reset is further
    /// away than the policy allows, or the tracker error from the quota
    /// query.
    pub async fn wait_for_quota<T>(&self, tracker: &T) -> TrackerResult<()>
    where
        T: IssueTracker + ?Sized,
    {
        let quota = tracker.quota().await?;
        if quota.remaining > 0 {
            return Ok(());
        }
        let until_reset = (quota.reset_at - self.clock.utc())
            .to_std()
            .unwrap_or(Duration::ZERO);
        let wait = until_reset + self.policy.safety_margin;
        if wait > self.policy.max_wait {
            return Err(TrackerError::QuotaWaitExceeded {
                wait,
                max_wait: self.policy.max_wait,
            });
        }
        info!(wait_secs = wait.as_secs(), reset_at = %quota.reset_at, "tracker quota exhausted, waiting");
        self.sleeper.sleep(wait).await;
        Ok(())
    }

    /// Runs `call`, retrying once after the overload backoff when it fails
    /// transiently.
    ///
    /// # Errors
    ///
    /// Returns the error of the second attempt, or the first error when it
    /// is not transient.
    pub async fn retry_once<T, F, Fut>(&self, operation: &str, mut call: F) -> TrackerResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = TrackerResult<T>>,
    {
        match call().await {
            Err(err) if err.is_transient() => {
                warn!(
                    operation,
                    error = %err,
                    backoff_secs = self.policy.overload_backoff.as_secs(),
                    "tracker overloaded, retrying once"
                );
                self.sleeper.sleep(self.policy.overload_backoff).await;
                call().await
            }
            result => result,
        }
    }
}
