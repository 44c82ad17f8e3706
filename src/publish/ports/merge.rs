//! Merge request port on the hosting service.

use crate::publish::domain::{BranchName, MergeMethod, MergeRequestNumber};
use crate::review::ports::TrackerResult;
use async_trait::async_trait;

/// Hosting-service merge request contract.
///
/// Shares the tracker error type since both live on the same service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MergeRequests: Send + Sync {
    /// Opens a request to merge `head` into `base`.
    async fn create(
        &self,
        head: &BranchName,
        base: &BranchName,
        title: &str,
    ) -> TrackerResult<MergeRequestNumber>;

    /// Merges an open request.
    async fn merge(&self, number: MergeRequestNumber, method: MergeMethod) -> TrackerResult<()>;
}
