//! Branch names and the branch layout of the working copy.

use super::PublishDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated git branch name.
///
/// Names must be non-empty after trimming, start with neither `-` nor `/`,
/// and contain no whitespace or `..`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchName(String);

impl BranchName {
    /// Creates a validated branch name.
    ///
    /// # Errors
    ///
    /// Returns [`PublishDomainError::InvalidBranchName`] when the value
    /// violates the naming rules.
    pub fn new(value: impl Into<String>) -> Result<Self, PublishDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if Self::is_invalid(normalized) {
            return Err(PublishDomainError::InvalidBranchName(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    fn is_invalid(name: &str) -> bool {
        name.is_empty()
            || name.starts_with('-')
            || name.starts_with('/')
            || name.contains("..")
            || name.chars().any(|ch| ch.is_whitespace() || ch.is_control())
    }

    /// Returns the branch name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `remote/branch` for use as a rebase upstream.
    #[must_use]
    pub fn on_remote(&self, remote: &RemoteName) -> String {
        format!("{remote}/{self}")
    }
}

impl TryFrom<String> for BranchName {
    type Error = PublishDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BranchName> for String {
    fn from(value: BranchName) -> Self {
        value.0
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated git remote name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RemoteName(String);

impl RemoteName {
    /// Creates a validated remote name.
    ///
    /// # Errors
    ///
    /// Returns [`PublishDomainError::InvalidRemote`] when the value is empty
    /// or contains whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, PublishDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() || normalized.chars().any(char::is_whitespace) {
            return Err(PublishDomainError::InvalidRemote(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the remote name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RemoteName {
    type Error = PublishDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RemoteName> for String {
    fn from(value: RemoteName) -> Self {
        value.0
    }
}

impl fmt::Display for RemoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Branches and remote a publish cycle operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchLayout {
    main: BranchName,
    review: BranchName,
    remote: RemoteName,
}

impl BranchLayout {
    /// Creates a layout with distinct main and review branches.
    ///
    /// # Errors
    ///
    /// Returns [`PublishDomainError::SameBranches`] when both names match.
    pub fn new(
        main: BranchName,
        review: BranchName,
        remote: RemoteName,
    ) -> Result<Self, PublishDomainError> {
        if main == review {
            return Err(PublishDomainError::SameBranches(main.0));
        }
        Ok(Self {
            main,
            review,
            remote,
        })
    }

    /// Branch merge requests target.
    #[must_use]
    pub const fn main(&self) -> &BranchName {
        &self.main
    }

    /// Branch commits are pushed to.
    #[must_use]
    pub const fn review(&self) -> &BranchName {
        &self.review
    }

    /// Remote both branches track.
    #[must_use]
    pub const fn remote(&self) -> &RemoteName {
        &self.remote
    }
}
