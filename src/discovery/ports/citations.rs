//! Citation-graph port.

use crate::bibliography::domain::Doi;
use crate::discovery::domain::Reference;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for citation-graph lookups.
pub type CitationResult<T> = Result<T, CitationError>;

/// Outbound references and inbound citations of one publication.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CitationLinks {
    /// Works the publication cites.
    pub references: Vec<Reference>,
    /// Works citing the publication.
    pub citations: Vec<Reference>,
}

impl CitationLinks {
    /// Returns all entries, references first.
    #[must_use]
    pub fn into_entries(self) -> Vec<Reference> {
        let mut entries = self.references;
        entries.extend(self.citations);
        entries
    }
}

/// Citation-graph service contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CitationGraph: Send + Sync {
    /// Short service name used in logs.
    fn name(&self) -> &'static str;

    /// Retrieves the links this service knows for `doi`.
    ///
    /// # Errors
    ///
    /// Returns [`CitationError::NotFound`] when the service has no entry for
    /// the identifier.
    async fn links(&self, doi: &Doi) -> CitationResult<CitationLinks>;
}

/// Errors returned by citation-graph implementations.
#[derive(Debug, Clone, Error)]
pub enum CitationError {
    /// The service has no entry for the identifier.
    #[error("no citation data for {0}")]
    NotFound(Doi),

    /// The service answered with an error status.
    #[error("citation service responded with status {status}")]
    Unavailable {
        /// HTTP status.
        status: u16,
    },

    /// Network or decoding failure.
    #[error("citation service transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl CitationError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
