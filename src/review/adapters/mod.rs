//! Adapter implementations for review request tracking.

pub mod github;
pub mod memory;
pub mod sleep;

pub use github::GitHubTracker;
pub use memory::{InMemoryIssueTracker, StoredIssue, StoredMergeRequest};
pub use sleep::TokioSleeper;
