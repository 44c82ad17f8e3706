//! Tests for the review transition engine over the in-memory tracker.

use super::at;
use crate::bibliography::domain::{
    BibliographyError, CitationKey, Collection, CollectionName, Record, WorkingSet,
};
use crate::review::{
    adapters::{InMemoryIssueTracker, TokioSleeper},
    domain::{IssueEdit, IssueState, ReviewDomainError, ReviewLabel},
    ports::IssueTracker,
    services::{RateLimitGate, RateLimitPolicy, ReviewServiceError, ReviewTransitionService},
};
use eyre::{Result, ensure, eyre};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use std::sync::Arc;

const MAINTAINER: &str = "curator";

struct Harness {
    tracker: Arc<InMemoryIssueTracker>,
    service: ReviewTransitionService<InMemoryIssueTracker>,
}

#[fixture]
fn harness() -> Harness {
    let tracker = Arc::new(InMemoryIssueTracker::new());
    let gate = RateLimitGate::new(
        Arc::new(DefaultClock),
        Arc::new(TokioSleeper),
        RateLimitPolicy::default(),
    );
    let service = ReviewTransitionService::new(Arc::clone(&tracker), gate, MAINTAINER);
    Harness { tracker, service }
}

fn record(key: &str, doi: &str) -> Result<Record> {
    Ok(Record::new("article", CitationKey::new(key)?).with_field("doi", doi))
}

fn in_review(records: Vec<Record>) -> WorkingSet {
    WorkingSet::from_collections([Collection::new(CollectionName::InReview, records)])
}

#[rstest]
#[tokio::test]
async fn yes_moves_record_and_relabels_open_request(harness: Harness) -> Result<()> {
    let issue = harness
        .tracker
        .seed_issue("Smith2020", &[ReviewLabel::InReview])?;
    harness.tracker.post_as(issue, MAINTAINER, "yes", at(0))?;
    let mut working_set = in_review(vec![record("Smith2020", "10.1/abc")?]);

    let decisions = harness.service.collect_decisions().await?;
    harness.service.apply(&mut working_set, &decisions)?;
    harness.service.publish_labels(&decisions).await?;

    ensure!(decisions.len() == 1);
    ensure!(working_set.collection(CollectionName::InReview).is_empty());
    ensure!(working_set.collection(CollectionName::InScope).len() == 1);
    ensure!(
        working_set.dirty() == vec![CollectionName::InReview, CollectionName::InScope]
    );
    let stored = harness
        .tracker
        .issue(issue)?
        .ok_or_else(|| eyre!("issue should exist"))?;
    ensure!(stored.request.labels == vec!["in-scope".to_owned(), "check-references".to_owned()]);
    ensure!(stored.request.state == IssueState::Open);
    Ok(())
}

#[rstest]
#[tokio::test]
async fn relabel_keeps_labels_added_by_the_maintainer(harness: Harness) -> Result<()> {
    let issue = harness
        .tracker
        .seed_issue("Doe2021", &[ReviewLabel::InReview])?;
    harness
        .tracker
        .edit(
            issue,
            &IssueEdit::labels(vec!["needs-pdf".to_owned(), "in-review".to_owned()]),
        )
        .await?;
    harness.tracker.post_as(issue, MAINTAINER, "no", at(0))?;
    let mut working_set = in_review(vec![record("Doe2021", "10.1/def")?]);

    let decisions = harness.service.collect_decisions().await?;
    harness.service.apply(&mut working_set, &decisions)?;
    harness.service.publish_labels(&decisions).await?;

    let stored = harness
        .tracker
        .issue(issue)?
        .ok_or_else(|| eyre!("issue should exist"))?;
    ensure!(stored.request.labels == vec!["needs-pdf".to_owned(), "not-in-scope".to_owned()]);
    ensure!(stored.request.state == IssueState::Closed);
    Ok(())
}

#[rstest]
#[tokio::test]
async fn no_moves_record_and_closes_request(harness: Harness) -> Result<()> {
    let issue = harness
        .tracker
        .seed_issue("Doe2021", &[ReviewLabel::InReview])?;
    harness.tracker.post_as(issue, MAINTAINER, "NO", at(0))?;
    let mut working_set = in_review(vec![record("Doe2021", "10.1/def")?]);

    let decisions = harness.service.collect_decisions().await?;
    harness.service.apply(&mut working_set, &decisions)?;
    harness.service.publish_labels(&decisions).await?;

    ensure!(working_set.collection(CollectionName::NotInScope).len() == 1);
    let stored = harness
        .tracker
        .issue(issue)?
        .ok_or_else(|| eyre!("issue should exist"))?;
    ensure!(stored.request.labels == vec!["not-in-scope".to_owned()]);
    ensure!(stored.request.state == IssueState::Closed);
    let line = decisions
        .first()
        .map(crate::review::services::Decision::commit_line);
    ensure!(line.as_deref() == Some(format!("Move Doe2021 to not-in-scope #{issue}").as_str()));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn requests_without_qualifying_comment_stay_pending(harness: Harness) -> Result<()> {
    let issue = harness
        .tracker
        .seed_issue("Smith2020", &[ReviewLabel::InReview])?;
    harness.tracker.post_as(issue, "someone", "yes", at(0))?;
    harness.tracker.post_as(issue, MAINTAINER, "hmm, not sure", at(1))?;

    let decisions = harness.service.collect_decisions().await?;

    ensure!(decisions.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test]
async fn malformed_label_state_is_fatal(harness: Harness) -> Result<()> {
    let issue = harness
        .tracker
        .seed_issue("Smith2020", &[ReviewLabel::InReview, ReviewLabel::InScope])?;
    harness.tracker.post_as(issue, MAINTAINER, "yes", at(0))?;

    let result = harness.service.collect_decisions().await;

    ensure!(matches!(
        result,
        Err(ReviewServiceError::Domain(ReviewDomainError::InvalidLabelState { .. }))
    ));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn decision_for_unknown_record_is_fatal(harness: Harness) -> Result<()> {
    let issue = harness
        .tracker
        .seed_issue("Ghost1999", &[ReviewLabel::InReview])?;
    harness.tracker.post_as(issue, MAINTAINER, "yes", at(0))?;
    let mut working_set = in_review(vec![record("Smith2020", "10.1/abc")?]);

    let decisions = harness.service.collect_decisions().await?;
    let result = harness.service.apply(&mut working_set, &decisions);

    ensure!(matches!(
        result,
        Err(ReviewServiceError::Bibliography(BibliographyError::MissingRecord { .. }))
    ));
    Ok(())
}
