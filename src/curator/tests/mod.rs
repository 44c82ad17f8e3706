//! Unit tests for run orchestration over the in-memory stack.


use chrono::{DateTime, TimeZone, Utc};
use mockable::DefaultClock;
use std::sync::Arc;

use crate::bibliography::domain::{CitationKey, Doi, Record};
use crate::curator::{Adapters, Curator, CuratorSettings, InMemory};
use crate::discovery::{domain::BatchSize, ports::RegistryEntry};
use crate::publish::domain::{BranchLayout, BranchName, RemoteName};
use crate::review::{
    adapters::TokioSleeper,
    services::{RateLimitGate, RateLimitPolicy},
};

pub(super) const MAINTAINER: &str = "curator";

/// In-memory adapters plus a curator wired over them.
pub(super) struct Harness {
    pub adapters: Adapters<InMemory>,
    pub curator: Curator<InMemory>,
}

pub(super) fn harness_with_batch(batch_size: usize) -> Harness {
    let adapters = InMemory::adapters();
    let layout = BranchLayout::new(
        branch("master"),
        branch("develop"),
        RemoteName::new("origin").unwrap_or_else(|err| panic!("remote invalid: {err}")),
    )
    .unwrap_or_else(|err| panic!("layout invalid: {err}"));
    let settings = CuratorSettings {
        maintainer: MAINTAINER.to_owned(),
        layout,
        batch_size: BatchSize::new(batch_size)
            .unwrap_or_else(|err| panic!("batch size invalid: {err}")),
    };
    let gate = RateLimitGate::new(
        Arc::new(DefaultClock),
        Arc::new(TokioSleeper),
        RateLimitPolicy::default(),
    );
    let curator = Curator::new(adapters.clone(), settings, gate);
    Harness { adapters, curator }
}

fn branch(name: &str) -> BranchName {
    BranchName::new(name).unwrap_or_else(|err| panic!("branch {name} invalid: {err}"))
}

pub(super) fn doi(raw: &str) -> Doi {
    Doi::parse(raw).unwrap_or_else(|err| panic!("test identifier {raw} invalid: {err}"))
}

pub(super) fn record(key: &str, author: &str, year: &str, id: &str) -> Record {
    Record::new(
        "article",
        CitationKey::new(key).unwrap_or_else(|err| panic!("test key {key} invalid: {err}")),
    )
    .with_field("author", author)
    .with_field("title", format!("On {key}"))
    .with_field("year", year)
    .with_field("doi", id)
}

pub(super) fn entry(key: &str, author: &str, year: &str, id: &str) -> RegistryEntry {
    RegistryEntry::new(record(key, author, year, id))
}

pub(super) fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0)
        .single()
        .map(|base| base + chrono::Duration::minutes(minutes))
        .unwrap_or_else(|| panic!("fixed base timestamp should be valid"))
}
