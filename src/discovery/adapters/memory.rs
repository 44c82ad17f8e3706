//! In-memory citation graph, registry and ledger for tests and dry runs.

use async_trait::async_trait;
use camino::Utf8PathBuf;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::bibliography::domain::Doi;
use crate::discovery::{
    domain::{DoiBatch, PendingLedger},
    ports::{
        CitationError, CitationGraph, CitationLinks, CitationResult, LedgerError, LedgerResult,
        LedgerStore, MetadataRegistry, RegistryEntry, RegistryError, RegistryResult, Resolution,
    },
};

fn poisoned(err: &impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(err.to_string())
}

/// Citation graph answering from a fixed table.
///
/// Unknown identifiers have no links. Marking the graph offline makes every
/// lookup fail with [`CitationError::Unavailable`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryCitationGraph {
    name: &'static str,
    links: Arc<RwLock<HashMap<Doi, CitationLinks>>>,
    offline: Arc<RwLock<bool>>,
}

impl InMemoryCitationGraph {
    /// Creates an empty graph reporting `name` in logs.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    /// Sets the links returned for `doi`.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn insert(&self, doi: Doi, links: CitationLinks) -> CitationResult<()> {
        self.links
            .write()
            .map_err(|err| CitationError::transport(poisoned(&err)))?
            .insert(doi, links);
        Ok(())
    }

    /// Makes later lookups fail, or succeed again.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn set_offline(&self, offline: bool) -> CitationResult<()> {
        *self
            .offline
            .write()
            .map_err(|err| CitationError::transport(poisoned(&err)))? = offline;
        Ok(())
    }
}

#[async_trait]
impl CitationGraph for InMemoryCitationGraph {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn links(&self, doi: &Doi) -> CitationResult<CitationLinks> {
        let offline = *self
            .offline
            .read()
            .map_err(|err| CitationError::transport(poisoned(&err)))?;
        if offline {
            return Err(CitationError::Unavailable { status: 503 });
        }
        let links = self
            .links
            .read()
            .map_err(|err| CitationError::transport(poisoned(&err)))?;
        Ok(links.get(doi).cloned().unwrap_or_default())
    }
}

/// Registry answering from a fixed table and recording batch sizes.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    entries: Arc<RwLock<HashMap<Doi, RegistryEntry>>>,
    requests: Arc<RwLock<Vec<usize>>>,
}

impl InMemoryRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the entry returned for `doi`.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn insert(&self, doi: Doi, entry: RegistryEntry) -> RegistryResult<()> {
        self.entries
            .write()
            .map_err(|err| RegistryError::transport(poisoned(&err)))?
            .insert(doi, entry);
        Ok(())
    }

    /// Returns the size of every batch resolved so far.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn batch_sizes(&self) -> RegistryResult<Vec<usize>> {
        Ok(self
            .requests
            .read()
            .map_err(|err| RegistryError::transport(poisoned(&err)))?
            .clone())
    }
}

#[async_trait]
impl MetadataRegistry for InMemoryRegistry {
    async fn resolve_batch(&self, batch: &DoiBatch) -> RegistryResult<Vec<Resolution>> {
        self.requests
            .write()
            .map_err(|err| RegistryError::transport(poisoned(&err)))?
            .push(batch.len());
        let entries = self
            .entries
            .read()
            .map_err(|err| RegistryError::transport(poisoned(&err)))?;
        Ok(batch
            .identifiers()
            .iter()
            .map(|doi| Resolution {
                doi: doi.clone(),
                entry: entries.get(doi).cloned(),
            })
            .collect())
    }
}

/// Ledger held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedgerStore {
    ledger: Arc<RwLock<PendingLedger>>,
}

impl InMemoryLedgerStore {
    /// Creates an empty ledger store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored ledger.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when lock acquisition fails.
    pub fn snapshot(&self) -> LedgerResult<PendingLedger> {
        Ok(self
            .ledger
            .read()
            .map_err(|err| LedgerError::persistence(poisoned(&err)))?
            .clone())
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn load(&self) -> LedgerResult<PendingLedger> {
        self.snapshot()
    }

    async fn save(&self, ledger: &PendingLedger) -> LedgerResult<()> {
        let mut stored = self
            .ledger
            .write()
            .map_err(|err| LedgerError::persistence(poisoned(&err)))?;
        stored.clone_from(ledger);
        Ok(())
    }

    fn location(&self) -> Utf8PathBuf {
        Utf8PathBuf::from("bib/unresolved.json")
    }
}
