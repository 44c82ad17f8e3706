//! Loading and flushing the per-run working set.

use crate::bibliography::{
    domain::{Collection, CollectionName, WorkingSet},
    ports::{RecordStore, RecordStoreResult},
};
use camino::Utf8PathBuf;
use std::sync::Arc;
use tracing::info;

/// Moves collections between the record store and a [`WorkingSet`].
#[derive(Clone)]
pub struct SnapshotService<S>
where
    S: RecordStore,
{
    store: Arc<S>,
}

impl<S> SnapshotService<S>
where
    S: RecordStore,
{
    /// Creates a snapshot service over a store.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Loads all four collections once.
    ///
    /// # Errors
    ///
    /// Returns store errors when a collection cannot be read or decoded.
    /// Returns [`crate::bibliography::ports::RecordStoreError::Inconsistent`]
    /// when an identifier or display key occurs in more than one record.
    pub async fn load(&self) -> RecordStoreResult<WorkingSet> {
        let mut collections = Vec::with_capacity(CollectionName::ALL.len());
        for name in CollectionName::ALL {
            let records = self.store.read(name).await?;
            collections.push(Collection::new(name, records));
        }
        let working_set = WorkingSet::from_collections(collections);
        working_set.validate()?;
        info!(
            in_review = working_set.collection(CollectionName::InReview).len(),
            in_scope = working_set.collection(CollectionName::InScope).len(),
            not_in_scope = working_set.collection(CollectionName::NotInScope).len(),
            literature = working_set.collection(CollectionName::Literature).len(),
            "loaded record store"
        );
        Ok(working_set)
    }

    /// Writes every modified collection and returns the paths written.
    ///
    /// # Errors
    ///
    /// Returns store errors when a collection cannot be written. The working
    /// set keeps its modifications on failure.
    pub async fn flush(&self, working_set: &mut WorkingSet) -> RecordStoreResult<Vec<Utf8PathBuf>> {
        let mut written = Vec::new();
        for name in working_set.dirty() {
            self.store
                .write(name, working_set.collection(name).records())
                .await?;
            written.push(self.store.location(name));
        }
        working_set.mark_clean();
        Ok(written)
    }
}
