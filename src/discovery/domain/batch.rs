//! Bounded identifier batches.

use super::DiscoveryDomainError;
use crate::bibliography::domain::Doi;

/// Most identifiers submitted to the registry in one request.
pub const MAX_BATCH: usize = 50;

/// Validated batch size in `1..=MAX_BATCH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSize(usize);

impl BatchSize {
    /// Largest allowed batch size.
    pub const MAX: Self = Self(MAX_BATCH);

    /// Creates a validated batch size.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryDomainError::InvalidBatchSize`] outside
    /// `1..=MAX_BATCH`.
    pub const fn new(size: usize) -> Result<Self, DiscoveryDomainError> {
        if size == 0 || size > MAX_BATCH {
            return Err(DiscoveryDomainError::InvalidBatchSize {
                size,
                max: MAX_BATCH,
            });
        }
        Ok(Self(size))
    }

    /// Returns the size.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl Default for BatchSize {
    fn default() -> Self {
        Self::MAX
    }
}

/// At most [`MAX_BATCH`] identifiers handled by one intake pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DoiBatch(Vec<Doi>);

impl DoiBatch {
    /// Creates a batch.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryDomainError::BatchTooLarge`] when more than
    /// [`MAX_BATCH`] identifiers are supplied.
    pub fn new(identifiers: Vec<Doi>) -> Result<Self, DiscoveryDomainError> {
        if identifiers.len() > MAX_BATCH {
            return Err(DiscoveryDomainError::BatchTooLarge {
                len: identifiers.len(),
                max: MAX_BATCH,
            });
        }
        Ok(Self(identifiers))
    }

    /// Splits identifiers into consecutive batches of at most `size`.
    #[must_use]
    pub fn chunk(identifiers: &[Doi], size: BatchSize) -> Vec<Self> {
        identifiers
            .chunks(size.get())
            .map(|chunk| Self(chunk.to_vec()))
            .collect()
    }

    /// Returns the identifiers accepted by `keep`, in order.
    #[must_use]
    pub fn filtered(&self, mut keep: impl FnMut(&Doi) -> bool) -> Self {
        Self(self.0.iter().filter(|doi| keep(doi)).cloned().collect())
    }

    /// Returns the identifiers.
    #[must_use]
    pub fn identifiers(&self) -> &[Doi] {
        &self.0
    }

    /// Returns the number of identifiers.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the batch is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a DoiBatch {
    type Item = &'a Doi;
    type IntoIter = std::slice::Iter<'a, Doi>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
