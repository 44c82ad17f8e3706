//! In-memory snapshot of the record store and identity resolution.
//!
//! A run loads all four collections once into a [`WorkingSet`], applies every
//! mutation to it, and flushes the modified collections at the end. The
//! snapshot enforces the store invariants: an identifier (compared
//! case-insensitively) and a display key each occur at most once across the
//! union of all collections.

use super::{BibliographyError, CitationKey, Collection, CollectionName, Doi, Record};
use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;

/// Suffix alphabet tried, in order, when a base key is already taken.
pub const KEY_SUFFIXES: RangeInclusive<char> = 'a'..='z';

/// Snapshot of all four collections for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingSet {
    in_review: Collection,
    not_in_scope: Collection,
    in_scope: Collection,
    literature: Collection,
    dirty: BTreeSet<CollectionName>,
}

impl Default for WorkingSet {
    fn default() -> Self {
        Self {
            in_review: Collection::new(CollectionName::InReview, Vec::new()),
            not_in_scope: Collection::new(CollectionName::NotInScope, Vec::new()),
            in_scope: Collection::new(CollectionName::InScope, Vec::new()),
            literature: Collection::new(CollectionName::Literature, Vec::new()),
            dirty: BTreeSet::new(),
        }
    }
}

impl WorkingSet {
    /// Builds a snapshot from loaded collections.
    ///
    /// Collections missing from the input start empty. A later collection
    /// with the same name replaces an earlier one.
    #[must_use]
    pub fn from_collections(collections: impl IntoIterator<Item = Collection>) -> Self {
        let mut working_set = Self::default();
        for collection in collections {
            let name = collection.name();
            *working_set.slot_mut(name) = collection;
        }
        working_set
    }

    /// Checks that identifiers and display keys are unique across the store.
    ///
    /// Records without an identifier only take part in the key check.
    ///
    /// # Errors
    ///
    /// Returns [`BibliographyError::DuplicateDoi`] or
    /// [`BibliographyError::DuplicateKey`] naming the collection holding the
    /// first occurrence.
    pub fn validate(&self) -> Result<(), BibliographyError> {
        let mut dois: BTreeMap<Doi, CollectionName> = BTreeMap::new();
        let mut keys: BTreeMap<&CitationKey, CollectionName> = BTreeMap::new();
        for (name, record) in self.records() {
            if let Some(doi) = record.doi() {
                if let Some(&collection) = dois.get(&doi) {
                    return Err(BibliographyError::DuplicateDoi { doi, collection });
                }
                dois.insert(doi, name);
            }
            if let Some(&collection) = keys.get(record.key()) {
                return Err(BibliographyError::DuplicateKey {
                    key: record.key().clone(),
                    collection,
                });
            }
            keys.insert(record.key(), name);
        }
        Ok(())
    }

    /// Returns a collection by name.
    #[must_use]
    pub const fn collection(&self, name: CollectionName) -> &Collection {
        match name {
            CollectionName::InReview => &self.in_review,
            CollectionName::NotInScope => &self.not_in_scope,
            CollectionName::InScope => &self.in_scope,
            CollectionName::Literature => &self.literature,
        }
    }

    const fn slot_mut(&mut self, name: CollectionName) -> &mut Collection {
        match name {
            CollectionName::InReview => &mut self.in_review,
            CollectionName::NotInScope => &mut self.not_in_scope,
            CollectionName::InScope => &mut self.in_scope,
            CollectionName::Literature => &mut self.literature,
        }
    }

    /// Iterates all records with their collection.
    pub fn records(&self) -> impl Iterator<Item = (CollectionName, &Record)> {
        CollectionName::ALL.into_iter().flat_map(move |name| {
            self.collection(name)
                .records()
                .iter()
                .map(move |record| (name, record))
        })
    }

    /// Returns the collection already holding the identifier, if any.
    #[must_use]
    pub fn locate_doi(&self, doi: &Doi) -> Option<CollectionName> {
        self.records()
            .find(|(_, record)| record.doi().as_ref() == Some(doi))
            .map(|(name, _)| name)
    }

    /// Returns whether the identifier exists anywhere in the store.
    #[must_use]
    pub fn is_known(&self, doi: &Doi) -> bool {
        self.locate_doi(doi).is_some()
    }

    /// Returns the collection already using the key, if any.
    #[must_use]
    pub fn locate_key(&self, key: &CitationKey) -> Option<CollectionName> {
        self.records()
            .find(|(_, record)| record.key() == key)
            .map(|(name, _)| name)
    }

    /// Returns a collision-free key for `base`.
    ///
    /// `base` is returned unchanged when untaken; otherwise the first
    /// untaken single-letter suffix from [`KEY_SUFFIXES`] is appended.
    ///
    /// # Errors
    ///
    /// Returns [`BibliographyError::KeySpaceExhausted`] when every suffix is
    /// taken. This indicates a corrupted store and is not recoverable.
    pub fn assign_key(&self, base: &CitationKey) -> Result<CitationKey, BibliographyError> {
        if self.locate_key(base).is_none() {
            return Ok(base.clone());
        }
        KEY_SUFFIXES
            .map(|suffix| base.with_suffix(suffix))
            .find(|candidate| self.locate_key(candidate).is_none())
            .ok_or_else(|| BibliographyError::KeySpaceExhausted(base.clone()))
    }

    /// Appends a new record to `in-review`.
    ///
    /// # Errors
    ///
    /// Returns [`BibliographyError::MissingDoi`], [`BibliographyError::DuplicateDoi`]
    /// or [`BibliographyError::DuplicateKey`] when the record would break a
    /// store invariant.
    pub fn admit(&mut self, record: Record) -> Result<(), BibliographyError> {
        let doi = record.require_doi()?;
        if let Some(collection) = self.locate_doi(&doi) {
            return Err(BibliographyError::DuplicateDoi { doi, collection });
        }
        if let Some(collection) = self.locate_key(record.key()) {
            return Err(BibliographyError::DuplicateKey {
                key: record.key().clone(),
                collection,
            });
        }
        self.in_review.push(record);
        self.dirty.insert(CollectionName::InReview);
        Ok(())
    }

    /// Returns the single record with `key` in `collection`.
    ///
    /// # Errors
    ///
    /// Returns [`BibliographyError::MissingRecord`] when none matches and
    /// [`BibliographyError::AmbiguousRecord`] when several do.
    pub fn find_unique(
        &self,
        collection: CollectionName,
        key: &str,
    ) -> Result<&Record, BibliographyError> {
        let index = self.unique_index(collection, key)?;
        self.collection(collection)
            .records()
            .get(index)
            .ok_or_else(|| BibliographyError::MissingRecord {
                key: key.to_owned(),
                collection,
            })
    }

    fn unique_index(&self, collection: CollectionName, key: &str) -> Result<usize, BibliographyError> {
        let matches: Vec<usize> = self
            .collection(collection)
            .records()
            .iter()
            .enumerate()
            .filter(|(_, record)| record.key().as_str() == key)
            .map(|(index, _)| index)
            .collect();
        match matches.as_slice() {
            [index] => Ok(*index),
            [] => Err(BibliographyError::MissingRecord {
                key: key.to_owned(),
                collection,
            }),
            many => Err(BibliographyError::AmbiguousRecord {
                key: key.to_owned(),
                collection,
                count: many.len(),
            }),
        }
    }

    /// Moves the record with `key` from `in-review` into `target`.
    ///
    /// Returns a copy of the moved record.
    ///
    /// # Errors
    ///
    /// Returns [`BibliographyError::InvalidMove`] unless `target` is
    /// `in-scope` or `not-in-scope`, and lookup errors from
    /// [`Self::find_unique`] when the key does not match exactly one record.
    pub fn transfer(
        &mut self,
        key: &str,
        target: CollectionName,
    ) -> Result<Record, BibliographyError> {
        let source = CollectionName::InReview;
        if !matches!(target, CollectionName::InScope | CollectionName::NotInScope) {
            return Err(BibliographyError::InvalidMove {
                from: source,
                to: target,
            });
        }
        let index = self.unique_index(source, key)?;
        let record = self
            .in_review
            .take(index)
            .ok_or_else(|| BibliographyError::MissingRecord {
                key: key.to_owned(),
                collection: source,
            })?;
        self.slot_mut(target).push(record.clone());
        self.dirty.insert(source);
        self.dirty.insert(target);
        Ok(record)
    }

    /// Returns the collections modified since load or the last flush.
    #[must_use]
    pub fn dirty(&self) -> Vec<CollectionName> {
        self.dirty.iter().copied().collect()
    }

    /// Forgets pending modifications after they were persisted.
    pub fn mark_clean(&mut self) {
        self.dirty.clear();
    }
}
