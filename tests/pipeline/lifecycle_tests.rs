//! A publication's path from intake to reference crawl.

use super::helpers::{MAINTAINER, doi, entry, read, workspace};
use bibwarden::bibliography::domain::CollectionName;
use bibwarden::bibliography::ports::RecordStore;
use bibwarden::discovery::{
    domain::{Reference, ReferenceOrigin},
    ports::CitationLinks,
};
use chrono::Utc;
use eyre::{Result, ensure, eyre};
use rstest::rstest;
use serde_json::json;

#[rstest]
#[tokio::test]
async fn accepted_publication_feeds_its_references_back_into_review() -> Result<()> {
    let ws = workspace("bibwarden_lifecycle")?;
    let adapters = &ws.adapters;
    adapters
        .registry
        .insert(doi("10.1/seed")?, entry("Smith, Jane", "2020", "10.1/seed")?)?;
    adapters
        .registry
        .insert(doi("10.1/next")?, entry("Jones, Kim", "2021", "10.1/next")?)?;
    adapters.primary.insert(
        doi("10.1/seed")?,
        CitationLinks {
            references: vec![
                Reference::from_raw(ReferenceOrigin::RegistryReference, json!({"DOI": "10.1/NEXT"})),
                Reference::from_raw(
                    ReferenceOrigin::RegistryReference,
                    json!({"unstructured": "Personal communication"}),
                ),
            ],
            citations: Vec::new(),
        },
    )?;

    let report = ws.curator.intake(&[doi("10.1/seed")?]).await?;
    let admitted = report
        .admitted
        .first()
        .ok_or_else(|| eyre!("seed should be admitted"))?;
    ensure!(read(&ws.root, "bib/in-review.bib")?.contains("@article{Smith2020,"));

    adapters
        .tracker
        .post_as(admitted.issue, MAINTAINER, "yes", Utc::now())?;
    let decisions = ws.curator.apply_transitions().await?;
    ensure!(decisions.len() == 1);
    ensure!(adapters.store.read(CollectionName::InReview).await?.is_empty());
    ensure!(read(&ws.root, "bib/in-scope.bib")?.contains("@article{Smith2020,"));

    let checks = ws.curator.check_references().await?;
    ensure!(checks.len() == 1);
    let in_review = adapters.store.read(CollectionName::InReview).await?;
    ensure!(in_review.iter().any(|record| record.key().as_str() == "Jones2021"));
    ensure!(read(&ws.root, "bib/unresolved.json")?.contains("Personal communication"));

    let titles: Vec<_> = adapters
        .tracker
        .issues()?
        .into_iter()
        .map(|issue| issue.request.title)
        .collect();
    ensure!(titles == vec!["Smith2020".to_owned(), "Jones2021".to_owned()]);
    Ok(())
}

#[rstest]
#[tokio::test]
async fn every_identifier_stays_in_one_collection() -> Result<()> {
    let ws = workspace("bibwarden_dedup")?;
    let adapters = &ws.adapters;
    adapters
        .registry
        .insert(doi("10.1/one")?, entry("Smith, Jane", "2020", "10.1/one")?)?;
    adapters
        .registry
        .insert(doi("10.1/two")?, entry("Smith, John", "2020", "10.1/two")?)?;

    ws.curator
        .intake(&[doi("10.1/one")?, doi("10.1/TWO")?, doi("10.1/One")?])
        .await?;
    ws.curator.intake(&[doi("10.1/two")?]).await?;

    let mut identifiers = Vec::new();
    let mut keys = Vec::new();
    for name in CollectionName::ALL {
        for record in adapters.store.read(name).await? {
            identifiers.push(record.require_doi()?);
            keys.push(record.key().clone());
        }
    }
    ensure!(identifiers.len() == 2);
    ensure!(keys.iter().map(|key| key.as_str()).collect::<Vec<_>>() == vec!["Smith2020", "Smith2020a"]);
    Ok(())
}
