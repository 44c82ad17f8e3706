//! Reference Expansion Pipeline.

use std::sync::Arc;
use tracing::{info, warn};

use crate::bibliography::domain::{Doi, WorkingSet};
use crate::discovery::{
    domain::{BatchSize, DoiBatch, Reference, partition},
    ports::{CitationGraph, CitationLinks, CitationResult},
};

/// Identifiers discovered around one publication.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Expansion {
    /// Unknown identifiers, bounded for intake.
    pub batches: Vec<DoiBatch>,
    /// Identifiers already somewhere in the record store.
    pub known: Vec<Doi>,
    /// Entries without any identifier.
    pub unresolvable: Vec<Reference>,
}

impl Expansion {
    /// Returns the number of identifiers queued for intake.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.batches.iter().map(DoiBatch::len).sum()
    }
}

/// Crawls the registry and the citation graph for new candidates.
///
/// `primary` is authoritative: its failure aborts the crawl. `secondary`
/// failures degrade to an empty result.
#[derive(Clone)]
pub struct ExpansionService<A, B>
where
    A: CitationGraph,
    B: CitationGraph,
{
    primary: Arc<A>,
    secondary: Arc<B>,
    batch_size: BatchSize,
}

impl<A, B> ExpansionService<A, B>
where
    A: CitationGraph,
    B: CitationGraph,
{
    /// Creates an expansion service.
    #[must_use]
    pub const fn new(primary: Arc<A>, secondary: Arc<B>, batch_size: BatchSize) -> Self {
        Self {
            primary,
            secondary,
            batch_size,
        }
    }

    /// Collects references and citations of `doi` and classifies them
    /// against the working set.
    ///
    /// # Errors
    ///
    /// Returns the primary service's error; nothing is queued in that case.
    pub async fn expand(&self, doi: &Doi, working_set: &WorkingSet) -> CitationResult<Expansion> {
        let primary = self.primary.links(doi).await?;
        let secondary = match self.secondary.links(doi).await {
            Ok(links) => links,
            Err(err) => {
                warn!(
                    doi = %doi,
                    service = self.secondary.name(),
                    error = %err,
                    "secondary citation service failed, continuing without it"
                );
                CitationLinks::default()
            }
        };

        let mut entries = primary.into_entries();
        entries.extend(secondary.into_entries());
        let total = entries.len();
        let split = partition(entries);
        for reference in &split.unresolvable {
            info!(doi = %doi, origin = %reference.origin(), "reference without identifier");
        }

        let (known, fresh): (Vec<Doi>, Vec<Doi>) = split
            .identifiers
            .into_iter()
            .partition(|candidate| working_set.is_known(candidate));
        for candidate in &known {
            info!(doi = %doi, reference = %candidate, "reference already known");
        }

        let expansion = Expansion {
            batches: DoiBatch::chunk(&fresh, self.batch_size),
            known,
            unresolvable: split.unresolvable,
        };
        info!(
            doi = %doi,
            entries = total,
            queued = expansion.pending(),
            known = expansion.known.len(),
            unresolvable = expansion.unresolvable.len(),
            "expanded references"
        );
        Ok(expansion)
    }
}
