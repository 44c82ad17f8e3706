//! Error types for review domain validation.

use super::{IssueNumber, ReviewCommand, ReviewState};
use thiserror::Error;

/// Errors returned while constructing review values or applying decisions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReviewDomainError {
    /// The repository name does not follow `owner/repo` format.
    #[error("invalid repository name '{0}', expected owner/repo")]
    InvalidRepository(String),

    /// The issue number is invalid.
    #[error("invalid issue number {0}, expected a positive integer")]
    InvalidIssueNumber(u64),

    /// The review request title is empty after trimming.
    #[error("review request title must not be empty")]
    EmptyTitle,

    /// The labels of a review request do not name exactly one review state.
    #[error("issue #{issue} has malformed label state {labels:?}")]
    InvalidLabelState {
        /// Offending issue.
        issue: IssueNumber,
        /// Labels found on the issue.
        labels: Vec<String>,
    },

    /// A decision was applied to a record that is no longer under review.
    #[error("cannot apply '{command}' to a review request in state {state}")]
    InvalidTransition {
        /// Current state.
        state: ReviewState,
        /// Rejected command.
        command: ReviewCommand,
    },
}

/// Error returned while parsing maintainer commands.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown review command: {0}")]
pub struct ParseReviewCommandError(pub String);

/// Error returned while parsing review labels.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown review label: {0}")]
pub struct ParseReviewLabelError(pub String);
