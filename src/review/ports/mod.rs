//! Port contracts for review request tracking.

pub mod sleeper;
pub mod tracker;

pub use sleeper::Sleeper;
pub use tracker::{IssueTracker, QuotaStatus, TrackerError, TrackerResult};

#[cfg(test)]
pub use sleeper::MockSleeper;
#[cfg(test)]
pub use tracker::MockIssueTracker;
