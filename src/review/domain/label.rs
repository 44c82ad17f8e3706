//! Labels carried by review requests.

use super::ParseReviewLabelError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Labels the pipeline reads and writes on review requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReviewLabel {
    /// Awaiting a maintainer decision.
    InReview,
    /// Accepted; references should be crawled.
    CheckReferences,
    /// Accepted.
    InScope,
    /// Rejected.
    NotInScope,
}

impl ReviewLabel {
    /// Returns the label name used on the tracker.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InReview => "in-review",
            Self::CheckReferences => "check-references",
            Self::InScope => "in-scope",
            Self::NotInScope => "not-in-scope",
        }
    }

    /// Returns whether the label names a review state.
    #[must_use]
    pub const fn is_state(self) -> bool {
        !matches!(self, Self::CheckReferences)
    }
}

impl fmt::Display for ReviewLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ReviewLabel {
    type Error = ParseReviewLabelError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "in-review" => Ok(Self::InReview),
            "check-references" => Ok(Self::CheckReferences),
            "in-scope" => Ok(Self::InScope),
            "not-in-scope" => Ok(Self::NotInScope),
            _ => Err(ParseReviewLabelError(value.to_owned())),
        }
    }
}

/// Returns `labels` with `removed` dropped, keeping foreign labels intact.
#[must_use]
pub fn without_label(labels: &[String], removed: ReviewLabel) -> Vec<String> {
    labels
        .iter()
        .filter(|label| ReviewLabel::try_from(label.as_str()) != Ok(removed))
        .cloned()
        .collect()
}

/// Replaces every pipeline label in `labels` with `added`.
///
/// Labels the pipeline does not own keep their position; `added` follows
/// them in order.
#[must_use]
pub fn relabel(labels: &[String], added: &[ReviewLabel]) -> Vec<String> {
    labels
        .iter()
        .filter(|label| ReviewLabel::try_from(label.as_str()).is_err())
        .cloned()
        .chain(added.iter().map(|label| label.as_str().to_owned()))
        .collect()
}
