//! Review request values exchanged with the issue tracker.

use super::{IssueNumber, IssueState, ReviewDomainError, ReviewLabel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tracked issue representing one record under review.
///
/// The title is the record's display key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRequest {
    /// Tracker issue number.
    pub number: IssueNumber,
    /// Issue title, equal to the record key.
    pub title: String,
    /// Label names currently on the issue.
    pub labels: Vec<String>,
    /// Open/closed state.
    pub state: IssueState,
}

impl ReviewRequest {
    /// Returns whether the issue carries `label`.
    #[must_use]
    pub fn has_label(&self, label: ReviewLabel) -> bool {
        self.labels
            .iter()
            .any(|name| ReviewLabel::try_from(name.as_str()) == Ok(label))
    }
}

/// Comment posted on a review request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Login of the comment author.
    pub author: String,
    /// Raw comment body.
    pub body: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Creates a comment.
    #[must_use]
    pub fn new(author: impl Into<String>, body: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            author: author.into(),
            body: body.into(),
            created_at,
        }
    }
}

/// Payload for opening a review request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewReviewRequest {
    title: String,
    body: String,
    labels: Vec<String>,
}

impl NewReviewRequest {
    /// Creates a payload labeled `in-review`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::EmptyTitle`] if the title is empty.
    pub fn in_review(title: impl Into<String>, body: impl Into<String>) -> Result<Self, ReviewDomainError> {
        let raw_title = title.into();
        let normalized = raw_title.trim();
        if normalized.is_empty() {
            return Err(ReviewDomainError::EmptyTitle);
        }
        Ok(Self {
            title: normalized.to_owned(),
            body: body.into(),
            labels: vec![ReviewLabel::InReview.as_str().to_owned()],
        })
    }

    /// Returns the issue title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the issue body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the initial labels.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

/// Modification applied to an existing issue.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IssueEdit {
    /// Replacement label set, when changing labels.
    pub labels: Option<Vec<String>>,
    /// New open/closed state, when changing state.
    pub state: Option<IssueState>,
}

impl IssueEdit {
    /// Creates an edit replacing the label set.
    #[must_use]
    pub const fn labels(labels: Vec<String>) -> Self {
        Self {
            labels: Some(labels),
            state: None,
        }
    }

    /// Creates an edit changing the open/closed state.
    #[must_use]
    pub const fn state(state: IssueState) -> Self {
        Self {
            labels: None,
            state: Some(state),
        }
    }
}
