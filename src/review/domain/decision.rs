//! Extraction of the maintainer decision from a comment thread.

use super::{Comment, ReviewCommand};

/// Why a comment did not count as a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    /// The author is not the configured maintainer.
    UnknownAuthor,
    /// The body is neither `yes` nor `no`.
    NotACommand,
}

/// Comment skipped while scanning for a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoredComment {
    /// Comment author.
    pub author: String,
    /// Comment body.
    pub body: String,
    /// Reason the comment was skipped.
    pub reason: IgnoredReason,
}

/// Outcome of scanning a review request's comments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecisionScan {
    /// Command from the most recent qualifying comment.
    pub command: Option<ReviewCommand>,
    /// Comments that did not qualify, in thread order.
    pub ignored: Vec<IgnoredComment>,
}

/// Finds the latest maintainer command in a chronological comment thread.
///
/// A comment qualifies when `maintainer` wrote it and its trimmed body is
/// `yes` or `no` in any case. The author comparison ignores ASCII case, as
/// tracker logins do.
#[must_use]
pub fn scan_decision(comments: &[Comment], maintainer: &str) -> DecisionScan {
    let mut scan = DecisionScan::default();
    for comment in comments {
        let reason = if !comment.author.eq_ignore_ascii_case(maintainer) {
            IgnoredReason::UnknownAuthor
        } else if let Ok(command) = ReviewCommand::try_from(comment.body.as_str()) {
            scan.command = Some(command);
            continue;
        } else {
            IgnoredReason::NotACommand
        };
        scan.ignored.push(IgnoredComment {
            author: comment.author.clone(),
            body: comment.body.clone(),
            reason,
        });
    }
    scan
}
