//! Shared world state for review pipeline BDD scenarios.

use std::sync::Arc;

use bibwarden::bibliography::domain::{CitationKey, Doi, Record};
use bibwarden::curator::{Adapters, Curator, CuratorSettings, InMemory};
use bibwarden::discovery::{domain::BatchSize, services::IntakeReport};
use bibwarden::publish::domain::{BranchLayout, BranchName, RemoteName};
use bibwarden::review::{
    adapters::TokioSleeper,
    domain::IssueNumber,
    services::{RateLimitGate, RateLimitPolicy},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Login whose comments count in the scenarios.
pub const MAINTAINER: &str = "curator";

/// Scenario world for pipeline behaviour tests.
pub struct PipelineWorld {
    pub adapters: Adapters<InMemory>,
    pub curator: Curator<InMemory>,
    pub issue: Option<IssueNumber>,
    pub last_intake: Option<IntakeReport>,
}

impl PipelineWorld {
    /// Creates a world over empty in-memory adapters.
    pub fn new() -> Result<Self, eyre::Report> {
        let adapters = InMemory::adapters();
        let settings = CuratorSettings {
            maintainer: MAINTAINER.to_owned(),
            layout: BranchLayout::new(
                BranchName::new("master")?,
                BranchName::new("develop")?,
                RemoteName::new("origin")?,
            )?,
            batch_size: BatchSize::default(),
        };
        let gate = RateLimitGate::new(
            Arc::new(DefaultClock),
            Arc::new(TokioSleeper),
            RateLimitPolicy::default(),
        );
        Ok(Self {
            curator: Curator::new(adapters.clone(), settings, gate),
            adapters,
            issue: None,
            last_intake: None,
        })
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> PipelineWorld {
    PipelineWorld::new().unwrap_or_else(|err| panic!("world setup failed: {err}"))
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Builds a stored record.
pub fn record(key: &str, author: &str, year: &str, doi: &str) -> Result<Record, eyre::Report> {
    Ok(Record::new("article", CitationKey::new(key)?)
        .with_field("author", author)
        .with_field("title", format!("On {key}"))
        .with_field("year", year)
        .with_field("doi", doi))
}

/// Parses an identifier.
pub fn doi(raw: &str) -> Result<Doi, eyre::Report> {
    Ok(Doi::parse(raw)?)
}
