//! Persistence port for the pending ledger.

use crate::discovery::domain::PendingLedger;
use async_trait::async_trait;
use camino::Utf8PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Result type for ledger persistence.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger persistence contract.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Loads the ledger; a missing ledger loads empty.
    async fn load(&self) -> LedgerResult<PendingLedger>;

    /// Replaces the stored ledger.
    async fn save(&self, ledger: &PendingLedger) -> LedgerResult<()>;

    /// Returns the working-copy relative path of the ledger.
    fn location(&self) -> Utf8PathBuf;
}

/// Errors returned by ledger stores.
#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    /// The stored ledger is not valid JSON of the expected shape.
    #[error("failed to decode ledger: {0}")]
    Decode(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl LedgerError {
    /// Wraps a decoding error.
    pub fn decode(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Decode(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
