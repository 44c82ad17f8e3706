//! Run configuration read from `bibwarden.toml`.
//!
//! Every key is optional except `repository` and `maintainer`, which have
//! no sensible default. A missing file is the same as an empty one.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::Deserialize;
use std::io;
use std::time::Duration;
use thiserror::Error;

use crate::discovery::domain::{BatchSize, DiscoveryDomainError, MAX_BATCH};
use crate::publish::domain::{BranchLayout, BranchName, PublishDomainError, RemoteName};
use crate::review::domain::{RepositoryFullName, ReviewDomainError};
use crate::review::services::RateLimitPolicy;

/// File name looked up at the working-copy root.
pub const CONFIG_FILE: &str = "bibwarden.toml";

/// Errors raised while loading configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read {path}: {reason}")]
    Read {
        /// Configuration path.
        path: Utf8PathBuf,
        /// IO failure message.
        reason: String,
    },

    /// The file is not valid TOML of the expected shape.
    #[error("failed to parse {path}: {reason}")]
    Parse {
        /// Configuration path.
        path: Utf8PathBuf,
        /// Parser message.
        reason: String,
    },

    /// A required key is absent.
    #[error("missing configuration key `{0}`")]
    Missing(&'static str),

    /// The repository name is malformed.
    #[error(transparent)]
    Repository(#[from] ReviewDomainError),

    /// A branch or remote name is malformed.
    #[error(transparent)]
    Branches(#[from] PublishDomainError),

    /// The batch size is out of range.
    #[error(transparent)]
    Batch(#[from] DiscoveryDomainError),
}

/// Rate-limit timings in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RateLimitConfig {
    /// Extra wait after the quota reset.
    pub safety_margin_secs: u64,
    /// Longest acceptable quota wait.
    pub max_wait_secs: u64,
    /// Pause before retrying an overloaded call.
    pub overload_backoff_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            safety_margin_secs: 5,
            max_wait_secs: 3600,
            overload_backoff_secs: 60,
        }
    }
}

impl RateLimitConfig {
    /// Converts to the gate policy.
    #[must_use]
    pub const fn policy(&self) -> RateLimitPolicy {
        RateLimitPolicy {
            safety_margin: Duration::from_secs(self.safety_margin_secs),
            max_wait: Duration::from_secs(self.max_wait_secs),
            overload_backoff: Duration::from_secs(self.overload_backoff_secs),
        }
    }
}

/// Settings of one curator run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CuratorConfig {
    /// Hosted repository in `owner/repo` form.
    pub repository: Option<String>,
    /// Login whose comments decide reviews.
    pub maintainer: Option<String>,
    /// Directory holding the collection files.
    pub bib_dir: Utf8PathBuf,
    /// Ledger file name inside `bib_dir`.
    pub ledger_file: Utf8PathBuf,
    /// Branch merge requests target.
    pub main_branch: String,
    /// Branch changes are committed on.
    pub review_branch: String,
    /// Remote both branches live on.
    pub remote: String,
    /// Identifiers per registry request.
    pub max_batch: usize,
    /// Address sent to the metadata services.
    pub contact_email: Option<String>,
    /// Quota and overload timings.
    pub rate_limit: RateLimitConfig,
}

impl Default for CuratorConfig {
    fn default() -> Self {
        Self {
            repository: None,
            maintainer: None,
            bib_dir: Utf8PathBuf::from("bib"),
            ledger_file: Utf8PathBuf::from("unresolved.json"),
            main_branch: "master".to_owned(),
            review_branch: "develop".to_owned(),
            remote: "origin".to_owned(),
            max_batch: MAX_BATCH,
            contact_email: None,
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl CuratorConfig {
    /// Parses configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys.
    pub fn parse(text: &str, origin: &Utf8Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|err| ConfigError::Parse {
            path: origin.to_owned(),
            reason: err.to_string(),
        })
    }

    /// Loads `path` relative to `workdir`, falling back to defaults when
    /// the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn load(workdir: &Utf8Path, path: &Utf8Path) -> Result<Self, ConfigError> {
        let read_error = |err: &io::Error| ConfigError::Read {
            path: path.to_owned(),
            reason: err.to_string(),
        };
        let dir = Dir::open_ambient_dir(workdir, ambient_authority()).map_err(|err| read_error(&err))?;
        match dir.read_to_string(path) {
            Ok(text) => Self::parse(&text, path),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(read_error(&err)),
        }
    }

    /// Returns the validated repository name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] or [`ConfigError::Repository`].
    pub fn repository(&self) -> Result<RepositoryFullName, ConfigError> {
        let raw = self
            .repository
            .as_deref()
            .ok_or(ConfigError::Missing("repository"))?;
        Ok(RepositoryFullName::new(raw)?)
    }

    /// Returns the maintainer login.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when unset or blank.
    pub fn maintainer(&self) -> Result<&str, ConfigError> {
        self.maintainer
            .as_deref()
            .map(str::trim)
            .filter(|login| !login.is_empty())
            .ok_or(ConfigError::Missing("maintainer"))
    }

    /// Returns the validated branch layout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Branches`] for malformed or identical names.
    pub fn branch_layout(&self) -> Result<BranchLayout, ConfigError> {
        Ok(BranchLayout::new(
            BranchName::new(self.main_branch.as_str())?,
            BranchName::new(self.review_branch.as_str())?,
            RemoteName::new(self.remote.as_str())?,
        )?)
    }

    /// Returns the validated batch size.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Batch`] outside `1..=50`.
    pub fn batch_size(&self) -> Result<BatchSize, ConfigError> {
        Ok(BatchSize::new(self.max_batch)?)
    }

    /// Returns the ledger path relative to the working copy.
    #[must_use]
    pub fn ledger_path(&self) -> Utf8PathBuf {
        self.bib_dir.join(&self.ledger_file)
    }
}
