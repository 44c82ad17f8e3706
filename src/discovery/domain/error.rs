//! Error types for discovery domain validation.

use thiserror::Error;

/// Errors returned while building identifier batches.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DiscoveryDomainError {
    /// A batch size outside `1..=MAX_BATCH` was requested.
    #[error("batch size {size} outside 1..={max}")]
    InvalidBatchSize {
        /// Requested size.
        size: usize,
        /// Largest allowed size.
        max: usize,
    },

    /// More identifiers than fit in one registry request.
    #[error("batch of {len} identifiers exceeds the limit of {max}")]
    BatchTooLarge {
        /// Identifiers supplied.
        len: usize,
        /// Largest allowed size.
        max: usize,
    },
}
