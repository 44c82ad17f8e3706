//! Review Transition Engine.

use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use super::RateLimitGate;
use crate::bibliography::domain::{BibliographyError, WorkingSet};
use crate::review::{
    domain::{
        IgnoredReason, IssueEdit, IssueNumber, IssueState, ReviewCommand, ReviewDomainError,
        ReviewLabel, ReviewRequest, ReviewState, TransitionOutcome, relabel, scan_decision,
        transition,
    },
    ports::{IssueTracker, TrackerError},
};

/// Errors returned while applying review decisions.
#[derive(Debug, Clone, Error)]
pub enum ReviewServiceError {
    /// A review request is in an impossible state.
    #[error(transparent)]
    Domain(#[from] ReviewDomainError),

    /// The record named by a review request could not be moved.
    #[error(transparent)]
    Bibliography(#[from] BibliographyError),

    /// The issue tracker failed.
    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

/// Result type for review service operations.
pub type ReviewServiceResult<T> = Result<T, ReviewServiceError>;

/// Decision found on one review request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Review request carrying the decision.
    pub issue: IssueNumber,
    /// Record key, taken from the request title.
    pub key: String,
    /// Labels the request carried when the decision was read.
    pub labels: Vec<String>,
    /// Maintainer command.
    pub command: ReviewCommand,
    /// Computed state change.
    pub outcome: TransitionOutcome,
}

impl Decision {
    /// Returns the commit title line for this move.
    #[must_use]
    pub fn commit_line(&self) -> String {
        format!("Move {} to {} #{}", self.key, self.outcome.state, self.issue)
    }
}

/// Turns maintainer comments into collection moves and label updates.
#[derive(Clone)]
pub struct ReviewTransitionService<T>
where
    T: IssueTracker,
{
    tracker: Arc<T>,
    gate: RateLimitGate,
    maintainer: String,
}

impl<T> ReviewTransitionService<T>
where
    T: IssueTracker,
{
    /// Creates a service honouring commands from `maintainer` only.
    #[must_use]
    pub fn new(tracker: Arc<T>, gate: RateLimitGate, maintainer: impl Into<String>) -> Self {
        Self {
            tracker,
            gate,
            maintainer: maintainer.into(),
        }
    }

    /// Collects the decisions pending on open `in-review` requests.
    ///
    /// Requests without a qualifying comment yield nothing and are
    /// revisited next run.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::InvalidLabelState`] when a request does
    /// not carry exactly one state label, and tracker errors.
    pub async fn collect_decisions(&self) -> ReviewServiceResult<Vec<Decision>> {
        self.gate.wait_for_quota(&*self.tracker).await?;
        let requests = self.tracker.list_issues(ReviewLabel::InReview).await?;
        let mut decisions = Vec::new();
        for request in requests {
            if let Some(decision) = self.decide(&request).await? {
                decisions.push(decision);
            }
        }
        info!(count = decisions.len(), "collected review decisions");
        Ok(decisions)
    }

    async fn decide(&self, request: &ReviewRequest) -> ReviewServiceResult<Option<Decision>> {
        let state = ReviewState::from_labels(request.number, &request.labels)?;
        self.gate.wait_for_quota(&*self.tracker).await?;
        let comments = self.tracker.comments(request.number).await?;
        let scan = scan_decision(&comments, &self.maintainer);
        for ignored in &scan.ignored {
            match ignored.reason {
                IgnoredReason::UnknownAuthor => info!(
                    issue = request.number.value(),
                    author = %ignored.author,
                    "ignoring comment from unknown user"
                ),
                IgnoredReason::NotACommand => info!(
                    issue = request.number.value(),
                    body = %ignored.body,
                    "ignoring comment that is not a command"
                ),
            }
        }
        let Some(command) = scan.command else {
            info!(issue = request.number.value(), key = %request.title, "no decision yet");
            return Ok(None);
        };
        let outcome = transition(state, command)?;
        Ok(Some(Decision {
            issue: request.number,
            key: request.title.clone(),
            labels: request.labels.clone(),
            command,
            outcome,
        }))
    }

    /// Moves each decided record into its target collection.
    ///
    /// # Errors
    ///
    /// Returns [`BibliographyError::MissingRecord`] or
    /// [`BibliographyError::AmbiguousRecord`] when a request title does not
    /// name exactly one `in-review` record.
    pub fn apply(
        &self,
        working_set: &mut WorkingSet,
        decisions: &[Decision],
    ) -> ReviewServiceResult<()> {
        for decision in decisions {
            let target = decision.outcome.collection();
            working_set.transfer(&decision.key, target)?;
            info!(
                issue = decision.issue.value(),
                key = %decision.key,
                command = %decision.command,
                target = %target,
                "moved record"
            );
        }
        Ok(())
    }

    /// Updates labels, and closes rejected requests, after the moves were
    /// published.
    ///
    /// State labels are replaced; labels the pipeline does not own are kept.
    ///
    /// # Errors
    ///
    /// Returns tracker errors; requests edited before the failure keep
    /// their new labels.
    pub async fn publish_labels(&self, decisions: &[Decision]) -> ReviewServiceResult<()> {
        for decision in decisions {
            self.gate.wait_for_quota(&*self.tracker).await?;
            let edit = IssueEdit {
                labels: Some(relabel(&decision.labels, &decision.outcome.labels)),
                state: (decision.outcome.issue_state == IssueState::Closed)
                    .then_some(IssueState::Closed),
            };
            if let Err(err) = self.tracker.edit(decision.issue, &edit).await {
                warn!(issue = decision.issue.value(), error = %err, "failed to relabel review request");
                return Err(err.into());
            }
        }
        Ok(())
    }
}
