//! Shared fixtures for pipeline integration tests.

use std::sync::Arc;

use bibwarden::bibliography::{
    adapters::FileRecordStore,
    domain::{CitationKey, Doi, Record},
};
use bibwarden::curator::{Adapters, Curator, CuratorSettings, InMemory, Stack};
use bibwarden::discovery::{
    adapters::{FileLedgerStore, InMemoryCitationGraph, InMemoryRegistry},
    domain::BatchSize,
    ports::RegistryEntry,
};
use bibwarden::publish::{
    adapters::RecordingVersionControl,
    domain::{BranchLayout, BranchName, RemoteName},
};
use bibwarden::review::{
    adapters::{InMemoryIssueTracker, TokioSleeper},
    services::{RateLimitGate, RateLimitPolicy},
};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use mockable::DefaultClock;

/// Login whose comments count.
pub const MAINTAINER: &str = "curator";

/// Collections and ledger on disk, everything else in memory.
pub struct FileBacked;

impl Stack for FileBacked {
    type Store = FileRecordStore;
    type Ledger = FileLedgerStore;
    type Registry = InMemoryRegistry;
    type Primary = InMemoryCitationGraph;
    type Secondary = InMemoryCitationGraph;
    type Tracker = InMemoryIssueTracker;
    type Vcs = RecordingVersionControl;
    type Merges = InMemoryIssueTracker;
}

/// Working copy directory plus a curator over it.
pub struct Workspace {
    pub root: Utf8PathBuf,
    pub adapters: Adapters<FileBacked>,
    pub curator: Curator<FileBacked>,
}

/// Creates a unique directory under the system temp dir.
pub fn create_temp_dir(prefix: &str) -> Result<Utf8PathBuf, eyre::Report> {
    let base = Utf8PathBuf::try_from(std::env::temp_dir())?;
    let dir_name = format!("{prefix}_{}", uuid::Uuid::new_v4());
    let base_dir = Dir::open_ambient_dir(&base, ambient_authority())?;
    base_dir.create_dir(&dir_name)?;
    Ok(base.join(dir_name))
}

/// Returns branch settings used by every test.
pub fn settings() -> Result<CuratorSettings, eyre::Report> {
    Ok(CuratorSettings {
        maintainer: MAINTAINER.to_owned(),
        layout: BranchLayout::new(
            BranchName::new("master")?,
            BranchName::new("develop")?,
            RemoteName::new("origin")?,
        )?,
        batch_size: BatchSize::default(),
    })
}

fn gate() -> RateLimitGate {
    RateLimitGate::new(
        Arc::new(DefaultClock),
        Arc::new(TokioSleeper),
        RateLimitPolicy::default(),
    )
}

/// Opens a workspace in a fresh temp dir.
pub fn workspace(prefix: &str) -> Result<Workspace, eyre::Report> {
    let root = create_temp_dir(prefix)?;
    let memory = InMemory::adapters();
    let adapters = Adapters::<FileBacked> {
        store: Arc::new(FileRecordStore::open(&root, "bib")?),
        ledger: Arc::new(FileLedgerStore::open(&root, "bib/unresolved.json")?),
        registry: memory.registry,
        primary: memory.primary,
        secondary: memory.secondary,
        tracker: memory.tracker,
        vcs: memory.vcs,
        merges: memory.merges,
    };
    let curator = Curator::new(adapters.clone(), settings()?, gate());
    Ok(Workspace {
        root,
        adapters,
        curator,
    })
}

/// Reads a working-copy file.
pub fn read(root: &Utf8Path, path: &str) -> Result<String, eyre::Report> {
    Ok(Dir::open_ambient_dir(root, ambient_authority())?.read_to_string(path)?)
}

/// Parses an identifier.
pub fn doi(raw: &str) -> Result<Doi, eyre::Report> {
    Ok(Doi::parse(raw)?)
}

/// Builds a registry entry.
pub fn entry(author: &str, year: &str, id: &str) -> Result<RegistryEntry, eyre::Report> {
    let record = Record::new("article", CitationKey::new("registry")?)
        .with_field("author", author)
        .with_field("title", format!("A paper by {author}"))
        .with_field("year", year)
        .with_field("doi", id);
    Ok(RegistryEntry::new(record))
}
