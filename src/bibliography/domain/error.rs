//! Error types for bibliography domain validation and invariants.

use super::{CitationKey, CollectionName, Doi};
use thiserror::Error;

/// Errors returned while constructing or mutating bibliography values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BibliographyError {
    /// The identifier is empty after normalization.
    #[error("identifier must not be empty")]
    EmptyDoi,

    /// The citation key is empty or contains characters BibTeX rejects.
    #[error("invalid citation key '{0}'")]
    InvalidCitationKey(String),

    /// Every suffix `a..z` is already taken for the base key.
    #[error("no untaken suffix left for citation key '{0}'")]
    KeySpaceExhausted(CitationKey),

    /// A record with the same identifier already exists in the store.
    #[error("identifier {doi} already exists in collection {collection}")]
    DuplicateDoi {
        /// Identifier that collided.
        doi: Doi,
        /// Collection already holding the identifier.
        collection: CollectionName,
    },

    /// A record with the same citation key already exists in the store.
    #[error("citation key {key} already exists in collection {collection}")]
    DuplicateKey {
        /// Key that collided.
        key: CitationKey,
        /// Collection already holding the key.
        collection: CollectionName,
    },

    /// A record carries no identifier but one is required.
    #[error("record {0} has no doi field")]
    MissingDoi(CitationKey),

    /// No record with the key exists in the collection.
    #[error("no record with key {key} in collection {collection}")]
    MissingRecord {
        /// Requested key.
        key: String,
        /// Collection searched.
        collection: CollectionName,
    },

    /// More than one record with the key exists in the collection.
    #[error("{count} records with key {key} in collection {collection}")]
    AmbiguousRecord {
        /// Requested key.
        key: String,
        /// Collection searched.
        collection: CollectionName,
        /// Number of matching records.
        count: usize,
    },

    /// Records can only be moved out of `in-review` into a terminal collection.
    #[error("cannot move records from {from} to {to}")]
    InvalidMove {
        /// Source collection.
        from: CollectionName,
        /// Target collection.
        to: CollectionName,
    },
}

/// Error returned while parsing collection names.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown collection: {0}")]
pub struct ParseCollectionNameError(pub String);
