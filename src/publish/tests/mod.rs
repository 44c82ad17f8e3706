//! Unit tests for the publish cycle.


use crate::publish::domain::{BranchLayout, BranchName, RemoteName};
use eyre::Result;

/// Returns the `master`/`develop` layout on `origin`.
pub(super) fn layout() -> Result<BranchLayout> {
    Ok(BranchLayout::new(
        BranchName::new("master")?,
        BranchName::new("develop")?,
        RemoteName::new("origin")?,
    )?)
}
