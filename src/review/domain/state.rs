//! Review lifecycle state machine.
//!
//! A record under review moves `in-review -> in-scope | not-in-scope`, both
//! terminal. [`transition`] is pure: it computes the target state, the
//! labels the review request should carry afterward and whether the request
//! stays open.

use super::{IssueNumber, ParseReviewCommandError, ReviewDomainError, ReviewLabel};
use crate::bibliography::domain::CollectionName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Review state of a tracked record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReviewState {
    /// Awaiting a decision.
    InReview,
    /// Accepted.
    InScope,
    /// Rejected.
    NotInScope,
}

impl ReviewState {
    /// Returns the canonical state name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InReview => "in-review",
            Self::InScope => "in-scope",
            Self::NotInScope => "not-in-scope",
        }
    }

    /// Returns whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::InReview)
    }

    /// Returns the label naming this state.
    #[must_use]
    pub const fn label(self) -> ReviewLabel {
        match self {
            Self::InReview => ReviewLabel::InReview,
            Self::InScope => ReviewLabel::InScope,
            Self::NotInScope => ReviewLabel::NotInScope,
        }
    }

    /// Returns the collection holding records in this state.
    #[must_use]
    pub const fn collection(self) -> CollectionName {
        match self {
            Self::InReview => CollectionName::InReview,
            Self::InScope => CollectionName::InScope,
            Self::NotInScope => CollectionName::NotInScope,
        }
    }

    /// Derives the state from the labels of a review request.
    ///
    /// Unknown labels and `check-references` are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::InvalidLabelState`] unless exactly one
    /// state label is present.
    pub fn from_labels(issue: IssueNumber, labels: &[String]) -> Result<Self, ReviewDomainError> {
        let states: Vec<Self> = labels
            .iter()
            .filter_map(|label| ReviewLabel::try_from(label.as_str()).ok())
            .filter_map(Self::from_label)
            .collect();
        match states.as_slice() {
            [state] => Ok(*state),
            _ => Err(ReviewDomainError::InvalidLabelState {
                issue,
                labels: labels.to_vec(),
            }),
        }
    }

    const fn from_label(label: ReviewLabel) -> Option<Self> {
        match label {
            ReviewLabel::InReview => Some(Self::InReview),
            ReviewLabel::InScope => Some(Self::InScope),
            ReviewLabel::NotInScope => Some(Self::NotInScope),
            ReviewLabel::CheckReferences => None,
        }
    }
}

impl fmt::Display for ReviewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maintainer decision on a review request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewCommand {
    /// Accept the record.
    Yes,
    /// Reject the record.
    No,
}

impl ReviewCommand {
    /// Returns the literal command token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }
}

impl fmt::Display for ReviewCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ReviewCommand {
    type Error = ParseReviewCommandError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "yes" => Ok(Self::Yes),
            "no" => Ok(Self::No),
            _ => Err(ParseReviewCommandError(value.to_owned())),
        }
    }
}

/// Open/closed state of a tracked issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    /// The issue is open.
    Open,
    /// The issue is closed.
    Closed,
}

impl IssueState {
    /// Returns the tracker representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

/// Result of applying a command to a review state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionOutcome {
    /// State after the transition.
    pub state: ReviewState,
    /// Complete label set the review request should carry.
    pub labels: Vec<ReviewLabel>,
    /// Whether the request stays open.
    pub issue_state: IssueState,
}

impl TransitionOutcome {
    /// Returns the collection the record moves into.
    #[must_use]
    pub const fn collection(&self) -> CollectionName {
        self.state.collection()
    }
}

/// Applies a maintainer command to a review state.
///
/// `yes` accepts and requests reference crawling, leaving the request open;
/// `no` rejects and closes the request.
///
/// # Errors
///
/// Returns [`ReviewDomainError::InvalidTransition`] when `state` is terminal.
pub fn transition(
    state: ReviewState,
    command: ReviewCommand,
) -> Result<TransitionOutcome, ReviewDomainError> {
    if state.is_terminal() {
        return Err(ReviewDomainError::InvalidTransition { state, command });
    }
    Ok(match command {
        ReviewCommand::Yes => TransitionOutcome {
            state: ReviewState::InScope,
            labels: vec![ReviewLabel::InScope, ReviewLabel::CheckReferences],
            issue_state: IssueState::Open,
        },
        ReviewCommand::No => TransitionOutcome {
            state: ReviewState::NotInScope,
            labels: vec![ReviewLabel::NotInScope],
            issue_state: IssueState::Closed,
        },
    })
}
