//! Publish/Sync Cycle.

use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::publish::{
    domain::{BranchLayout, ChangeSet, MergeMethod, MergeRequestNumber},
    ports::{MergeRequests, VcsError, VersionControl},
};
use crate::review::{ports::TrackerError, services::RateLimitGate};

/// Errors returned by the publish cycle.
#[derive(Debug, Clone, Error)]
pub enum PublishError {
    /// The working copy has uncommitted changes to tracked files.
    #[error("working copy has uncommitted changes: {}", .paths.join(", "))]
    DirtyWorkingCopy {
        /// Modified paths.
        paths: Vec<String>,
    },

    /// A version-control operation failed.
    #[error(transparent)]
    Vcs(#[from] VcsError),

    /// Opening or merging the merge request failed.
    #[error(transparent)]
    MergeRequest(#[from] TrackerError),
}

/// Result type for publish operations.
pub type PublishResult<T> = Result<T, PublishError>;

/// Commits collection changes through a merged review branch.
#[derive(Clone)]
pub struct PublishCycle<V, M>
where
    V: VersionControl,
    M: MergeRequests,
{
    vcs: Arc<V>,
    merges: Arc<M>,
    gate: RateLimitGate,
    layout: BranchLayout,
}

impl<V, M> PublishCycle<V, M>
where
    V: VersionControl,
    M: MergeRequests,
{
    /// Creates a publish cycle.
    #[must_use]
    pub const fn new(vcs: Arc<V>, merges: Arc<M>, gate: RateLimitGate, layout: BranchLayout) -> Self {
        Self {
            vcs,
            merges,
            gate,
            layout,
        }
    }

    /// Refuses to continue when tracked files have uncommitted changes.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::DirtyWorkingCopy`] listing the changed paths.
    pub fn ensure_clean(&self) -> PublishResult<()> {
        let paths = self.vcs.modified_paths()?;
        if paths.is_empty() {
            return Ok(());
        }
        Err(PublishError::DirtyWorkingCopy { paths })
    }

    /// Commits `change`, merges it into the main branch and resynchronizes
    /// both branches.
    ///
    /// Empty change sets are skipped and return `None`.
    ///
    /// # Errors
    ///
    /// Returns the first failing version-control or merge request
    /// operation. Steps already taken are not undone.
    pub async fn publish(&self, change: &ChangeSet) -> PublishResult<Option<MergeRequestNumber>> {
        if change.is_empty() {
            info!("nothing to publish");
            return Ok(None);
        }
        let layout = &self.layout;
        self.vcs.checkout(layout.review())?;
        self.vcs.add(change.files())?;
        self.vcs.commit(&change.message())?;
        self.vcs.push(layout.remote(), layout.review(), false)?;

        let title = change.title();
        let number = self
            .gate
            .retry_once("open merge request", || {
                self.merges.create(layout.review(), layout.main(), title)
            })
            .await?;
        self.gate
            .retry_once("merge", || self.merges.merge(number, MergeMethod::Rebase))
            .await?;
        info!(merge_request = number.value(), title, files = change.files().len(), "published changes");

        self.resync()?;
        Ok(Some(number))
    }

    /// Fast-forwards main, rebases the review branch onto it and leaves
    /// main checked out.
    fn resync(&self) -> PublishResult<()> {
        let layout = &self.layout;
        self.vcs.checkout(layout.main())?;
        self.vcs.pull(layout.remote(), layout.main())?;
        self.vcs.checkout(layout.review())?;
        self.vcs.rebase(&layout.main().on_remote(layout.remote()))?;
        self.vcs.push(layout.remote(), layout.review(), true)?;
        self.vcs.checkout(layout.main())?;
        Ok(())
    }
}
