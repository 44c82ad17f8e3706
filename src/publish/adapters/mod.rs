//! Adapter implementations for publishing.

pub mod git;
pub mod memory;

pub use git::GitCli;
pub use memory::{RecordingVersionControl, VcsCall};
