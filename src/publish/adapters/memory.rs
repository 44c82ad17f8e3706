//! Recording version control for tests and dry runs.

use camino::Utf8PathBuf;
use std::sync::{Arc, Mutex};

use crate::publish::{
    domain::{BranchName, RemoteName},
    ports::{VcsError, VcsResult, VersionControl},
};

/// One operation seen by [`RecordingVersionControl`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VcsCall {
    /// Branch switch.
    Checkout(String),
    /// Staged files.
    Add(Vec<Utf8PathBuf>),
    /// Commit message.
    Commit(String),
    /// Push of a branch.
    Push {
        /// Remote name.
        remote: String,
        /// Branch name.
        branch: String,
        /// Whether the push overwrote the remote branch.
        force: bool,
    },
    /// Pull of a branch.
    Pull {
        /// Remote name.
        remote: String,
        /// Branch name.
        branch: String,
    },
    /// Rebase onto an upstream.
    Rebase(String),
}

#[derive(Debug, Default)]
struct RecordingState {
    calls: Vec<VcsCall>,
    modified: Vec<String>,
}

/// Version control that only records the operations it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingVersionControl {
    state: Arc<Mutex<RecordingState>>,
}

impl RecordingVersionControl {
    /// Creates a clean working copy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(&self, action: impl FnOnce(&mut RecordingState) -> T) -> VcsResult<T> {
        let mut state = self
            .state
            .lock()
            .map_err(|err| VcsError::spawn(std::io::Error::other(err.to_string())))?;
        Ok(action(&mut state))
    }

    /// Marks paths as having uncommitted changes.
    ///
    /// # Errors
    ///
    /// Returns a spawn error when lock acquisition fails.
    pub fn set_modified(&self, paths: Vec<String>) -> VcsResult<()> {
        self.with_state(|state| state.modified = paths)
    }

    /// Returns every recorded operation in order.
    ///
    /// # Errors
    ///
    /// Returns a spawn error when lock acquisition fails.
    pub fn calls(&self) -> VcsResult<Vec<VcsCall>> {
        self.with_state(|state| state.calls.clone())
    }

    fn record(&self, call: VcsCall) -> VcsResult<()> {
        self.with_state(|state| state.calls.push(call))
    }
}

impl VersionControl for RecordingVersionControl {
    fn modified_paths(&self) -> VcsResult<Vec<String>> {
        self.with_state(|state| state.modified.clone())
    }

    fn checkout(&self, branch: &BranchName) -> VcsResult<()> {
        self.record(VcsCall::Checkout(branch.to_string()))
    }

    fn add(&self, files: &[Utf8PathBuf]) -> VcsResult<()> {
        self.record(VcsCall::Add(files.to_vec()))
    }

    fn commit(&self, message: &str) -> VcsResult<()> {
        self.record(VcsCall::Commit(message.to_owned()))
    }

    fn push(&self, remote: &RemoteName, branch: &BranchName, force: bool) -> VcsResult<()> {
        self.record(VcsCall::Push {
            remote: remote.to_string(),
            branch: branch.to_string(),
            force,
        })
    }

    fn pull(&self, remote: &RemoteName, branch: &BranchName) -> VcsResult<()> {
        self.record(VcsCall::Pull {
            remote: remote.to_string(),
            branch: branch.to_string(),
        })
    }

    fn rebase(&self, upstream: &str) -> VcsResult<()> {
        self.record(VcsCall::Rebase(upstream.to_owned()))
    }
}
