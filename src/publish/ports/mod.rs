//! Port contracts for publishing.

pub mod merge;
pub mod vcs;

pub use merge::MergeRequests;
pub use vcs::{VcsError, VcsResult, VersionControl};

#[cfg(test)]
pub use merge::MockMergeRequests;
#[cfg(test)]
pub use vcs::MockVersionControl;
