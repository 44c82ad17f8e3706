//! Bibliographic registry port.

use crate::bibliography::domain::{Doi, Record};
use crate::discovery::domain::DoiBatch;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for registry lookups.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Metadata the registry holds for one identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    /// Parsed record under the registry's own key.
    pub record: Record,
    /// Plain-text abstract, when published.
    pub abstract_text: Option<String>,
    /// Link to a freely readable version, when known.
    pub open_access_url: Option<String>,
}

impl RegistryEntry {
    /// Creates an entry without abstract or open-access link.
    #[must_use]
    pub const fn new(record: Record) -> Self {
        Self {
            record,
            abstract_text: None,
            open_access_url: None,
        }
    }
}

/// Lookup outcome for one identifier of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Requested identifier.
    pub doi: Doi,
    /// Registry entry, `None` when the registry has no record.
    pub entry: Option<RegistryEntry>,
}

/// Bibliographic registry contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataRegistry: Send + Sync {
    /// Resolves every identifier of `batch`, in batch order.
    ///
    /// Identifiers the registry cannot supply a usable record for resolve to
    /// `None` rather than failing the batch. Errors are reserved for failures
    /// that affect every lookup, such as a lost connection.
    async fn resolve_batch(&self, batch: &DoiBatch) -> RegistryResult<Vec<Resolution>>;
}

/// Errors returned by registry implementations.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// Network failure.
    #[error("registry transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl RegistryError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
