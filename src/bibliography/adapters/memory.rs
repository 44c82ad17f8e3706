//! In-memory record store for tests and dry runs.

use async_trait::async_trait;
use camino::Utf8PathBuf;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::bibliography::{
    domain::{CollectionName, Record},
    ports::{RecordStore, RecordStoreError, RecordStoreResult},
};

/// Thread-safe in-memory record store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordStore {
    state: Arc<RwLock<HashMap<CollectionName, Vec<Record>>>>,
}

impl InMemoryRecordStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces a collection, bypassing the read-only rule for `literature`.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when lock acquisition fails.
    pub fn seed(&self, collection: CollectionName, records: Vec<Record>) -> RecordStoreResult<()> {
        let mut state = self.state.write().map_err(|err| {
            RecordStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        state.insert(collection, records);
        Ok(())
    }

    /// Returns the current contents of a collection.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when lock acquisition fails.
    pub fn snapshot(&self, collection: CollectionName) -> RecordStoreResult<Vec<Record>> {
        let state = self.state.read().map_err(|err| {
            RecordStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.get(&collection).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn read(&self, collection: CollectionName) -> RecordStoreResult<Vec<Record>> {
        self.snapshot(collection)
    }

    async fn write(&self, collection: CollectionName, records: &[Record]) -> RecordStoreResult<()> {
        if !collection.is_writable() {
            return Err(RecordStoreError::ReadOnly(collection));
        }
        self.seed(collection, records.to_vec())
    }

    fn location(&self, collection: CollectionName) -> Utf8PathBuf {
        Utf8PathBuf::from("bib").join(collection.file_name())
    }
}
