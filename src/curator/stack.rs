//! Adapter bundle a curator runs against.

use std::sync::Arc;

use crate::bibliography::ports::RecordStore;
use crate::discovery::ports::{CitationGraph, LedgerStore, MetadataRegistry};
use crate::publish::ports::{MergeRequests, VersionControl};
use crate::review::ports::IssueTracker;

/// Names the concrete adapter for every port.
pub trait Stack {
    /// Collection persistence.
    type Store: RecordStore;
    /// Pending ledger persistence.
    type Ledger: LedgerStore;
    /// Metadata registry used by intake.
    type Registry: MetadataRegistry;
    /// Authoritative citation service.
    type Primary: CitationGraph;
    /// Best-effort citation service.
    type Secondary: CitationGraph;
    /// Review request tracker.
    type Tracker: IssueTracker;
    /// Working copy.
    type Vcs: VersionControl;
    /// Merge request host.
    type Merges: MergeRequests;
}

/// Adapter instances for one run.
pub struct Adapters<S: Stack> {
    /// Collection persistence.
    pub store: Arc<S::Store>,
    /// Pending ledger persistence.
    pub ledger: Arc<S::Ledger>,
    /// Metadata registry.
    pub registry: Arc<S::Registry>,
    /// Authoritative citation service.
    pub primary: Arc<S::Primary>,
    /// Best-effort citation service.
    pub secondary: Arc<S::Secondary>,
    /// Review request tracker.
    pub tracker: Arc<S::Tracker>,
    /// Working copy.
    pub vcs: Arc<S::Vcs>,
    /// Merge request host.
    pub merges: Arc<S::Merges>,
}

impl<S: Stack> Clone for Adapters<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            ledger: Arc::clone(&self.ledger),
            registry: Arc::clone(&self.registry),
            primary: Arc::clone(&self.primary),
            secondary: Arc::clone(&self.secondary),
            tracker: Arc::clone(&self.tracker),
            vcs: Arc::clone(&self.vcs),
            merges: Arc::clone(&self.merges),
        }
    }
}
