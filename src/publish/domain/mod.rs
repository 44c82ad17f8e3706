//! Domain model for publishing collection changes.

mod branch;
mod change_set;
mod error;
mod merge_request;

pub use branch::{BranchLayout, BranchName, RemoteName};
pub use change_set::ChangeSet;
pub use error::PublishDomainError;
pub use merge_request::{MergeMethod, MergeRequestNumber};
