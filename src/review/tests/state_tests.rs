//! Tests for the pure review state machine and label handling.

use crate::bibliography::domain::CollectionName;
use crate::review::domain::{
    IssueNumber, IssueState, ReviewCommand, ReviewDomainError, ReviewLabel, ReviewState,
    relabel, transition, without_label,
};
use eyre::{Result, ensure};
use rstest::rstest;

fn labels(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_owned()).collect()
}

#[rstest]
fn yes_accepts_and_requests_reference_check() -> Result<()> {
    let outcome = transition(ReviewState::InReview, ReviewCommand::Yes)?;

    ensure!(outcome.state == ReviewState::InScope);
    ensure!(outcome.labels == vec![ReviewLabel::InScope, ReviewLabel::CheckReferences]);
    ensure!(outcome.issue_state == IssueState::Open);
    ensure!(outcome.collection() == CollectionName::InScope);
    Ok(())
}

#[rstest]
fn no_rejects_and_closes_without_reference_check() -> Result<()> {
    let outcome = transition(ReviewState::InReview, ReviewCommand::No)?;

    ensure!(outcome.state == ReviewState::NotInScope);
    ensure!(outcome.labels == vec![ReviewLabel::NotInScope]);
    ensure!(outcome.issue_state == IssueState::Closed);
    ensure!(outcome.collection() == CollectionName::NotInScope);
    Ok(())
}

#[rstest]
#[case(ReviewState::InScope, ReviewCommand::No)]
#[case(ReviewState::InScope, ReviewCommand::Yes)]
#[case(ReviewState::NotInScope, ReviewCommand::Yes)]
fn terminal_states_reject_commands(
    #[case] state: ReviewState,
    #[case] command: ReviewCommand,
) -> Result<()> {
    let result = transition(state, command);
    ensure!(result == Err(ReviewDomainError::InvalidTransition { state, command }));
    Ok(())
}

#[rstest]
#[case(&["in-review"], ReviewState::InReview)]
#[case(&["bug", "In-Review"], ReviewState::InReview)]
#[case(&["in-scope", "check-references"], ReviewState::InScope)]
#[case(&["not-in-scope"], ReviewState::NotInScope)]
fn from_labels_reads_the_single_state_label(
    #[case] names: &[&str],
    #[case] expected: ReviewState,
) -> Result<()> {
    let issue = IssueNumber::new(3)?;
    ensure!(ReviewState::from_labels(issue, &labels(names))? == expected);
    Ok(())
}

#[rstest]
#[case(&[])]
#[case(&["check-references"])]
#[case(&["in-review", "in-scope"])]
fn from_labels_rejects_malformed_label_state(#[case] names: &[&str]) -> Result<()> {
    let issue = IssueNumber::new(9)?;
    let result = ReviewState::from_labels(issue, &labels(names));
    ensure!(matches!(
        result,
        Err(ReviewDomainError::InvalidLabelState { issue: found, .. }) if found == issue
    ));
    Ok(())
}

#[rstest]
#[case("yes", Some(ReviewCommand::Yes))]
#[case("  YES\n", Some(ReviewCommand::Yes))]
#[case("No", Some(ReviewCommand::No))]
#[case("yes please", None)]
#[case("", None)]
fn commands_are_exact_tokens_ignoring_case(
    #[case] body: &str,
    #[case] expected: Option<ReviewCommand>,
) -> Result<()> {
    ensure!(ReviewCommand::try_from(body).ok() == expected);
    Ok(())
}

#[rstest]
fn without_label_keeps_foreign_labels() -> Result<()> {
    let current = labels(&["in-scope", "check-references", "needs-pdf"]);
    let remaining = without_label(&current, ReviewLabel::CheckReferences);
    ensure!(remaining == labels(&["in-scope", "needs-pdf"]));
    Ok(())
}

#[rstest]
fn relabel_swaps_state_labels_only() -> Result<()> {
    let current = labels(&["needs-pdf", "In-Review", "priority"]);
    let next = relabel(&current, &[ReviewLabel::InScope, ReviewLabel::CheckReferences]);
    ensure!(next == labels(&["needs-pdf", "priority", "in-scope", "check-references"]));
    Ok(())
}

#[rstest]
fn issue_number_rejects_zero() {
    assert_eq!(
        IssueNumber::new(0),
        Err(ReviewDomainError::InvalidIssueNumber(0))
    );
}
