//! Domain model for review requests and their lifecycle.

mod decision;
mod error;
mod ids;
mod label;
mod request;
mod state;

pub use decision::{DecisionScan, IgnoredComment, IgnoredReason, scan_decision};
pub use error::{ParseReviewCommandError, ParseReviewLabelError, ReviewDomainError};
pub use ids::{IssueNumber, RepositoryFullName};
pub use label::{ReviewLabel, relabel, without_label};
pub use request::{Comment, IssueEdit, NewReviewRequest, ReviewRequest};
pub use state::{IssueState, ReviewCommand, ReviewState, TransitionOutcome, transition};
