//! Named record collections.

use super::{ParseCollectionNameError, Record};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four disjoint collections of the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollectionName {
    /// Records awaiting a maintainer decision.
    InReview,
    /// Records rejected by the maintainer.
    NotInScope,
    /// Records accepted by the maintainer.
    InScope,
    /// Seed collection maintained out-of-band; never written here.
    Literature,
}

impl CollectionName {
    /// Every collection, in storage order.
    pub const ALL: [Self; 4] = [
        Self::InReview,
        Self::NotInScope,
        Self::InScope,
        Self::Literature,
    ];

    /// Returns the canonical collection name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InReview => "in-review",
            Self::NotInScope => "not-in-scope",
            Self::InScope => "in-scope",
            Self::Literature => "literature",
        }
    }

    /// Returns the file name holding the serialized collection.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::InReview => "in-review.bib",
            Self::NotInScope => "not-in-scope.bib",
            Self::InScope => "in-scope.bib",
            Self::Literature => "literature.bib",
        }
    }

    /// Returns whether the pipeline may write this collection.
    #[must_use]
    pub const fn is_writable(self) -> bool {
        !matches!(self, Self::Literature)
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for CollectionName {
    type Error = ParseCollectionNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == normalized)
            .ok_or_else(|| ParseCollectionNameError(value.to_owned()))
    }
}

/// Ordered list of records belonging to one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    name: CollectionName,
    records: Vec<Record>,
}

impl Collection {
    /// Creates a collection from loaded records.
    #[must_use]
    pub const fn new(name: CollectionName, records: Vec<Record>) -> Self {
        Self { name, records }
    }

    /// Returns the collection name.
    #[must_use]
    pub const fn name(&self) -> CollectionName {
        self.name
    }

    /// Returns the records in order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Returns the number of records.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns whether the collection holds no records.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub(crate) fn take(&mut self, index: usize) -> Option<Record> {
        (index < self.records.len()).then(|| self.records.remove(index))
    }
}
