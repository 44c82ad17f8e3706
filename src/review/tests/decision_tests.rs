//! Tests for extracting maintainer decisions from comment threads.

use super::at;
use crate::review::domain::{Comment, IgnoredReason, ReviewCommand, scan_decision};
use rstest::rstest;

const MAINTAINER: &str = "curator";

#[rstest]
fn latest_maintainer_command_wins() {
    let thread = vec![
        Comment::new(MAINTAINER, "yes", at(0)),
        Comment::new(MAINTAINER, "No", at(5)),
    ];

    let scan = scan_decision(&thread, MAINTAINER);

    assert_eq!(scan.command, Some(ReviewCommand::No));
    assert!(scan.ignored.is_empty());
}

#[rstest]
fn other_authors_are_ignored() {
    let thread = vec![
        Comment::new("drive-by", "yes", at(0)),
        Comment::new("bibwarden", "WDYT?", at(1)),
    ];

    let scan = scan_decision(&thread, MAINTAINER);

    assert_eq!(scan.command, None);
    assert_eq!(scan.ignored.len(), 2);
    assert!(
        scan.ignored
            .iter()
            .all(|comment| comment.reason == IgnoredReason::UnknownAuthor)
    );
}

#[rstest]
fn chatter_after_a_command_does_not_cancel_it() {
    let thread = vec![
        Comment::new(MAINTAINER, "Yes", at(0)),
        Comment::new(MAINTAINER, "thanks for the pointer", at(3)),
    ];

    let scan = scan_decision(&thread, MAINTAINER);

    assert_eq!(scan.command, Some(ReviewCommand::Yes));
    assert_eq!(scan.ignored.len(), 1);
    assert_eq!(
        scan.ignored.first().map(|comment| comment.reason),
        Some(IgnoredReason::NotACommand)
    );
}

#[rstest]
fn maintainer_login_matches_case_insensitively() {
    let thread = vec![Comment::new("Curator", "no", at(0))];
    assert_eq!(
        scan_decision(&thread, MAINTAINER).command,
        Some(ReviewCommand::No)
    );
}

#[rstest]
fn empty_thread_yields_no_decision() {
    let scan = scan_decision(&[], MAINTAINER);
    assert_eq!(scan.command, None);
    assert!(scan.ignored.is_empty());
}
