//! Error types for publish domain validation.

use thiserror::Error;

/// Errors returned while constructing publish values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PublishDomainError {
    /// The branch name is empty or contains characters git refuses.
    #[error("invalid branch name '{0}'")]
    InvalidBranchName(String),

    /// The remote name is empty or contains whitespace.
    #[error("invalid remote name '{0}'")]
    InvalidRemote(String),

    /// The merge request number is zero.
    #[error("invalid merge request number {0}, expected a positive integer")]
    InvalidMergeRequestNumber(u64),

    /// The main and review branches are the same.
    #[error("main and review branch must differ, both are '{0}'")]
    SameBranches(String),
}
