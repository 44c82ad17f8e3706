//! Then steps for review pipeline BDD scenarios.

use super::world::PipelineWorld;
use bibwarden::bibliography::domain::CollectionName;
use bibwarden::review::adapters::StoredIssue;
use bibwarden::review::domain::IssueState;
use eyre::eyre;
use rstest_bdd_macros::then;

fn collection_holds(
    world: &PipelineWorld,
    collection: CollectionName,
    key: &str,
) -> Result<(), eyre::Report> {
    let records = world.adapters.store.snapshot(collection)?;
    if records.iter().any(|stored| stored.key().as_str() == key) {
        return Ok(());
    }
    let keys: Vec<_> = records.iter().map(|stored| stored.key().to_string()).collect();
    Err(eyre!("expected {key} in {collection}, found {keys:?}"))
}

fn tracked_issue(world: &PipelineWorld) -> Result<StoredIssue, eyre::Report> {
    let issue = world.issue.ok_or_else(|| eyre!("no review request in scenario world"))?;
    world
        .adapters
        .tracker
        .issue(issue)?
        .ok_or_else(|| eyre!("review request {issue} missing"))
}

#[then(r#"the in-review collection contains "{key}""#)]
fn in_review_holds(world: &PipelineWorld, key: String) -> Result<(), eyre::Report> {
    collection_holds(world, CollectionName::InReview, &key)
}

#[then(r#"the in-scope collection contains "{key}""#)]
fn in_scope_holds(world: &PipelineWorld, key: String) -> Result<(), eyre::Report> {
    collection_holds(world, CollectionName::InScope, &key)
}

#[then(r#"the not-in-scope collection contains "{key}""#)]
fn not_in_scope_holds(world: &PipelineWorld, key: String) -> Result<(), eyre::Report> {
    collection_holds(world, CollectionName::NotInScope, &key)
}

#[then(r#"a review request titled "{title}" is labeled "{label}""#)]
fn request_labeled(world: &PipelineWorld, title: String, label: String) -> Result<(), eyre::Report> {
    let issues = world.adapters.tracker.issues()?;
    let found = issues
        .iter()
        .find(|issue| issue.request.title == title)
        .ok_or_else(|| eyre!("no review request titled {title}"))?;
    if found.request.labels != vec![label.clone()] {
        return Err(eyre!("expected label {label}, found {:?}", found.request.labels));
    }
    Ok(())
}

#[then("the identifier is reported as already known")]
fn reported_known(world: &PipelineWorld) -> Result<(), eyre::Report> {
    let report = world
        .last_intake
        .as_ref()
        .ok_or_else(|| eyre!("missing intake report"))?;
    if report.already_known.len() != 1 || !report.admitted.is_empty() {
        return Err(eyre!("expected one known identifier, got {report:?}"));
    }
    Ok(())
}

#[then("no review request exists")]
fn no_request(world: &PipelineWorld) -> Result<(), eyre::Report> {
    let issues = world.adapters.tracker.issues()?;
    if !issues.is_empty() {
        return Err(eyre!("expected no review request, found {}", issues.len()));
    }
    Ok(())
}

#[then("only the accepted review request exists")]
fn only_accepted_request(world: &PipelineWorld) -> Result<(), eyre::Report> {
    let issues = world.adapters.tracker.issues()?;
    if issues.len() != 1 {
        return Err(eyre!("expected one review request, found {}", issues.len()));
    }
    Ok(())
}

#[then(r#"the review request carries labels "{labels}""#)]
fn request_carries(world: &PipelineWorld, labels: String) -> Result<(), eyre::Report> {
    let expected: Vec<String> = labels.split(", ").map(str::to_owned).collect();
    let issue = tracked_issue(world)?;
    if issue.request.labels != expected {
        return Err(eyre!(
            "expected labels {expected:?}, found {:?}",
            issue.request.labels
        ));
    }
    Ok(())
}

#[then("the review request is open")]
fn request_open(world: &PipelineWorld) -> Result<(), eyre::Report> {
    expect_state(world, IssueState::Open)
}

#[then("the review request is closed")]
fn request_closed(world: &PipelineWorld) -> Result<(), eyre::Report> {
    expect_state(world, IssueState::Closed)
}

fn expect_state(world: &PipelineWorld, expected: IssueState) -> Result<(), eyre::Report> {
    let issue = tracked_issue(world)?;
    if issue.request.state != expected {
        return Err(eyre!("expected {expected:?}, found {:?}", issue.request.state));
    }
    Ok(())
}
