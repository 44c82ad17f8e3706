//! Concrete adapter stacks.

use camino::Utf8Path;
use std::sync::Arc;
use thiserror::Error;

use super::{Adapters, CuratorSettings, Stack};
use crate::bibliography::{
    adapters::{FileRecordStore, InMemoryRecordStore},
    ports::RecordStoreError,
};
use crate::config::{ConfigError, CuratorConfig};
use crate::discovery::{
    adapters::{
        CrossrefClient, FileLedgerStore, InMemoryCitationGraph, InMemoryLedgerStore,
        InMemoryRegistry, OpenAlexClient,
    },
    ports::LedgerError,
};
use crate::publish::adapters::{GitCli, RecordingVersionControl};
use crate::review::{
    adapters::{GitHubTracker, InMemoryIssueTracker},
    ports::TrackerError,
};

/// Errors raised while building the production stack.
#[derive(Debug, Clone, Error)]
pub enum WiringError {
    /// Configuration is incomplete or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The collection directory could not be opened.
    #[error(transparent)]
    Store(#[from] RecordStoreError),

    /// The ledger directory could not be opened.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The tracker client could not be built.
    #[error(transparent)]
    Tracker(#[from] TrackerError),

    /// A metadata service client could not be built.
    #[error("failed to build metadata client: {0}")]
    Http(Arc<reqwest::Error>),
}

impl From<reqwest::Error> for WiringError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(Arc::new(err))
    }
}

/// Files in the working copy, Crossref, `OpenAlex`, GitHub and `git`.
#[derive(Debug, Clone, Copy)]
pub struct Production;

impl Stack for Production {
    type Store = FileRecordStore;
    type Ledger = FileLedgerStore;
    type Registry = CrossrefClient;
    type Primary = CrossrefClient;
    type Secondary = OpenAlexClient;
    type Tracker = GitHubTracker;
    type Vcs = GitCli;
    type Merges = GitHubTracker;
}

impl Production {
    /// Builds adapters and settings for the working copy at `workdir`.
    ///
    /// # Errors
    ///
    /// Returns [`WiringError`] when configuration is incomplete or a client
    /// cannot be created.
    pub fn build(
        config: &CuratorConfig,
        workdir: &Utf8Path,
        token: &str,
    ) -> Result<(Adapters<Self>, CuratorSettings), WiringError> {
        let settings = CuratorSettings {
            maintainer: config.maintainer()?.to_owned(),
            layout: config.branch_layout()?,
            batch_size: config.batch_size()?,
        };
        let crossref = Arc::new(CrossrefClient::new(config.contact_email.clone())?);
        let tracker = Arc::new(GitHubTracker::new(config.repository()?, token)?);
        let adapters = Adapters {
            store: Arc::new(FileRecordStore::open(workdir, config.bib_dir.clone())?),
            ledger: Arc::new(FileLedgerStore::open(workdir, config.ledger_path())?),
            registry: Arc::clone(&crossref),
            primary: crossref,
            secondary: Arc::new(OpenAlexClient::new(config.contact_email.clone())?),
            tracker: Arc::clone(&tracker),
            vcs: Arc::new(GitCli::new(workdir)),
            merges: tracker,
        };
        Ok((adapters, settings))
    }
}

/// Everything in memory; used by tests and rehearsals.
#[derive(Debug, Clone, Copy)]
pub struct InMemory;

impl Stack for InMemory {
    type Store = InMemoryRecordStore;
    type Ledger = InMemoryLedgerStore;
    type Registry = InMemoryRegistry;
    type Primary = InMemoryCitationGraph;
    type Secondary = InMemoryCitationGraph;
    type Tracker = InMemoryIssueTracker;
    type Vcs = RecordingVersionControl;
    type Merges = InMemoryIssueTracker;
}

impl InMemory {
    /// Returns empty adapters; issues and merge requests share one tracker.
    #[must_use]
    pub fn adapters() -> Adapters<Self> {
        let tracker = Arc::new(InMemoryIssueTracker::new());
        Adapters {
            store: Arc::new(InMemoryRecordStore::new()),
            ledger: Arc::new(InMemoryLedgerStore::new()),
            registry: Arc::new(InMemoryRegistry::new()),
            primary: Arc::new(InMemoryCitationGraph::new("crossref")),
            secondary: Arc::new(InMemoryCitationGraph::new("openalex")),
            tracker: Arc::clone(&tracker),
            vcs: Arc::new(RecordingVersionControl::new()),
            merges: tracker,
        }
    }
}
