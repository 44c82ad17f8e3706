//! Merge request values.

use super::PublishDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Positive merge request number from the hosting service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MergeRequestNumber(u64);

impl MergeRequestNumber {
    /// Creates a validated merge request number.
    ///
    /// # Errors
    ///
    /// Returns [`PublishDomainError::InvalidMergeRequestNumber`] when the
    /// value is zero.
    pub const fn new(value: u64) -> Result<Self, PublishDomainError> {
        if value == 0 {
            return Err(PublishDomainError::InvalidMergeRequestNumber(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MergeRequestNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the hosting service merges a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMethod {
    /// Merge commit.
    Merge,
    /// Squash into one commit.
    Squash,
    /// Replay commits onto the base.
    Rebase,
}

impl MergeMethod {
    /// Returns the hosting service representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Merge => "merge",
            Self::Squash => "squash",
            Self::Rebase => "rebase",
        }
    }
}
