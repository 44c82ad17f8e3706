//! Repository port for persisted collections.

use crate::bibliography::{
    codec::CodecError,
    domain::{BibliographyError, CollectionName, Record},
};
use async_trait::async_trait;
use camino::Utf8PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Result type for record store operations.
pub type RecordStoreResult<T> = Result<T, RecordStoreError>;

/// Collection persistence contract.
///
/// Implementations hold each collection as its full serialized record list.
/// Writes replace the whole collection.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Reads every record of a collection.
    ///
    /// A collection that was never written reads as empty.
    async fn read(&self, collection: CollectionName) -> RecordStoreResult<Vec<Record>>;

    /// Replaces the contents of a collection.
    ///
    /// # Errors
    ///
    /// Returns [`RecordStoreError::ReadOnly`] for `literature`.
    async fn write(&self, collection: CollectionName, records: &[Record]) -> RecordStoreResult<()>;

    /// Returns the working-copy relative path holding the collection.
    fn location(&self, collection: CollectionName) -> Utf8PathBuf;
}

/// Errors returned by record store implementations.
#[derive(Debug, Clone, Error)]
pub enum RecordStoreError {
    /// The collection may not be written by the pipeline.
    #[error("collection {0} is read-only")]
    ReadOnly(CollectionName),

    /// Stored text could not be decoded.
    #[error("failed to decode collection {collection}: {source}")]
    Decode {
        /// Collection being read.
        collection: CollectionName,
        /// Codec failure.
        source: CodecError,
    },

    /// Loaded collections break a store invariant.
    #[error("inconsistent record store: {0}")]
    Inconsistent(#[from] BibliographyError),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl RecordStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
