//! Issue tracker port used to hold review requests.

use crate::review::domain::{
    Comment, IssueEdit, IssueNumber, NewReviewRequest, ReviewLabel, ReviewRequest,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result type for issue tracker operations.
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Remaining call quota reported by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaStatus {
    /// Calls left in the current window.
    pub remaining: u32,
    /// When the window resets.
    pub reset_at: DateTime<Utc>,
}

/// Issue tracker contract.
///
/// Calls are made strictly in sequence by a single run.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Opens a review request and returns its number.
    async fn create_issue(&self, request: &NewReviewRequest) -> TrackerResult<IssueNumber>;

    /// Lists open review requests carrying `label`, oldest first.
    async fn list_issues(&self, label: ReviewLabel) -> TrackerResult<Vec<ReviewRequest>>;

    /// Returns the comments of a review request in chronological order.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] for unknown issues.
    async fn comments(&self, issue: IssueNumber) -> TrackerResult<Vec<Comment>>;

    /// Posts a comment on a review request.
    async fn add_comment(&self, issue: IssueNumber, body: &str) -> TrackerResult<()>;

    /// Replaces labels and/or the open state of a review request.
    async fn edit(&self, issue: IssueNumber, edit: &IssueEdit) -> TrackerResult<()>;

    /// Reports the remaining call quota.
    async fn quota(&self) -> TrackerResult<QuotaStatus>;
}

/// Errors returned by issue tracker implementations.
#[derive(Debug, Clone, Error)]
pub enum TrackerError {
    /// The call quota is exhausted.
    #[error("issue tracker rate limit exhausted")]
    RateLimited,

    /// The tracker is temporarily overloaded.
    #[error("issue tracker temporarily unavailable (status {status})")]
    Transient {
        /// HTTP status reported, or 0 when unknown.
        status: u16,
    },

    /// The addressed issue or pull request does not exist.
    #[error("issue tracker resource not found")]
    NotFound,

    /// The tracker refused the request.
    #[error("issue tracker rejected request with status {status}: {message}")]
    Rejected {
        /// HTTP status.
        status: u16,
        /// Tracker message.
        message: String,
    },

    /// Waiting for the quota reset would exceed the configured bound.
    #[error("quota reset is {wait:?} away, more than the allowed {max_wait:?}")]
    QuotaWaitExceeded {
        /// Required wait.
        wait: Duration,
        /// Configured maximum wait.
        max_wait: Duration,
    },

    /// Network or decoding failure.
    #[error("issue tracker transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl TrackerError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Returns whether a single delayed retry may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}
