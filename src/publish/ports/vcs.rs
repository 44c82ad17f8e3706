//! Version-control port over the local working copy.

use crate::publish::domain::{BranchName, RemoteName};
use camino::Utf8PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Result type for version-control operations.
pub type VcsResult<T> = Result<T, VcsError>;

/// Working-copy operations the publish cycle needs.
///
/// Every call blocks until the underlying command finishes.
#[cfg_attr(test, mockall::automock)]
pub trait VersionControl: Send + Sync {
    /// Returns paths with uncommitted changes to tracked files.
    ///
    /// Untracked files are not reported.
    fn modified_paths(&self) -> VcsResult<Vec<String>>;

    /// Switches to `branch`.
    fn checkout(&self, branch: &BranchName) -> VcsResult<()>;

    /// Stages `files`.
    fn add(&self, files: &[Utf8PathBuf]) -> VcsResult<()>;

    /// Commits the staged changes.
    fn commit(&self, message: &str) -> VcsResult<()>;

    /// Pushes `branch` to `remote`, overwriting it when `force` is set.
    fn push(&self, remote: &RemoteName, branch: &BranchName, force: bool) -> VcsResult<()>;

    /// Pulls `branch` from `remote` into the current branch.
    fn pull(&self, remote: &RemoteName, branch: &BranchName) -> VcsResult<()>;

    /// Rebases the current branch onto `upstream`.
    fn rebase(&self, upstream: &str) -> VcsResult<()>;
}

/// Errors returned by version-control implementations.
#[derive(Debug, Clone, Error)]
pub enum VcsError {
    /// A command exited unsuccessfully.
    #[error("`{command}` failed with status {status:?}: {stderr}")]
    CommandFailed {
        /// Command line that failed.
        command: String,
        /// Exit code, absent when terminated by a signal.
        status: Option<i32>,
        /// Captured standard error.
        stderr: String,
    },

    /// The command could not be started.
    #[error("failed to run version control: {0}")]
    Spawn(Arc<dyn std::error::Error + Send + Sync>),
}

impl VcsError {
    /// Wraps a process spawn error.
    pub fn spawn(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Spawn(Arc::new(err))
    }
}
