//! Given steps for review pipeline BDD scenarios.

use super::world::{MAINTAINER, PipelineWorld, doi, record};
use bibwarden::bibliography::domain::CollectionName;
use bibwarden::discovery::{
    domain::{Reference, ReferenceOrigin},
    ports::{CitationLinks, RegistryEntry},
};
use bibwarden::review::domain::ReviewLabel;
use chrono::Utc;
use eyre::eyre;
use rstest_bdd_macros::given;
use serde_json::json;

#[given(r#"the registry knows "{id}" as "{author}" from {year:u32}"#)]
fn registry_knows(
    world: &mut PipelineWorld,
    id: String,
    author: String,
    year: u32,
) -> Result<(), eyre::Report> {
    let entry = RegistryEntry::new(record("Registry_key", &author, &year.to_string(), &id)?);
    world.adapters.registry.insert(doi(&id)?, entry)?;
    Ok(())
}

fn seed(
    world: &PipelineWorld,
    collection: CollectionName,
    key: &str,
    id: &str,
) -> Result<(), eyre::Report> {
    let mut records = world.adapters.store.snapshot(collection)?;
    records.push(record(key, "Someone, Sam", "1999", id)?);
    world.adapters.store.seed(collection, records)?;
    Ok(())
}

#[given(r#"the literature holds "{key}" with identifier "{id}""#)]
fn literature_holds(world: &mut PipelineWorld, key: String, id: String) -> Result<(), eyre::Report> {
    seed(world, CollectionName::Literature, &key, &id)
}

#[given(r#"the in-scope collection holds "{key}" with identifier "{id}""#)]
fn in_scope_holds(world: &mut PipelineWorld, key: String, id: String) -> Result<(), eyre::Report> {
    seed(world, CollectionName::InScope, &key, &id)
}

#[given(r#""{key}" with identifier "{id}" is under review"#)]
fn under_review(world: &mut PipelineWorld, key: String, id: String) -> Result<(), eyre::Report> {
    seed(world, CollectionName::InReview, &key, &id)?;
    let issue = world
        .adapters
        .tracker
        .seed_issue(&key, &[ReviewLabel::InReview])?;
    world.issue = Some(issue);
    Ok(())
}

#[given(r#""{key}" with identifier "{id}" was accepted"#)]
fn was_accepted(world: &mut PipelineWorld, key: String, id: String) -> Result<(), eyre::Report> {
    seed(world, CollectionName::InScope, &key, &id)?;
    let issue = world.adapters.tracker.seed_issue(
        &key,
        &[ReviewLabel::InScope, ReviewLabel::CheckReferences],
    )?;
    world.issue = Some(issue);
    Ok(())
}

#[given(r#"the maintainer comments "{body}""#)]
fn maintainer_comments(world: &mut PipelineWorld, body: String) -> Result<(), eyre::Report> {
    let issue = world.issue.ok_or_else(|| eyre!("no review request in scenario world"))?;
    world
        .adapters
        .tracker
        .post_as(issue, MAINTAINER, &body, Utc::now())?;
    Ok(())
}

#[given(r#"its references list "{first_field}" "{first}" and "{second_field}" "{second}""#)]
fn references_list(
    world: &mut PipelineWorld,
    first_field: String,
    first: String,
    second_field: String,
    second: String,
) -> Result<(), eyre::Report> {
    let subject = world
        .adapters
        .store
        .snapshot(CollectionName::InScope)?
        .into_iter()
        .find_map(|stored| stored.doi())
        .ok_or_else(|| eyre!("no accepted record in scenario world"))?;
    let links = CitationLinks {
        references: vec![
            Reference::from_raw(ReferenceOrigin::RegistryReference, json!({ first_field: first })),
            Reference::from_raw(ReferenceOrigin::RegistryReference, json!({ second_field: second })),
        ],
        citations: Vec::new(),
    };
    world.adapters.primary.insert(subject, links)?;
    Ok(())
}
