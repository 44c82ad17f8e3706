//! Run-level errors and their exit classification.

use std::process::ExitCode;
use thiserror::Error;

use crate::bibliography::{domain::BibliographyError, domain::Doi, ports::RecordStoreError};
use crate::discovery::{ports::LedgerError, services::IntakeError};
use crate::publish::services::PublishError;
use crate::review::{ports::TrackerError, services::ReviewServiceError};

/// Errors aborting a curator run.
#[derive(Debug, Clone, Error)]
pub enum CuratorError {
    /// Collections could not be read or written.
    #[error(transparent)]
    Store(#[from] RecordStoreError),

    /// The pending ledger could not be read or written.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// A record lookup or store invariant failed.
    #[error(transparent)]
    Bibliography(#[from] BibliographyError),

    /// Admitting identifiers failed.
    #[error(transparent)]
    Intake(#[from] IntakeError),

    /// Applying review decisions failed.
    #[error(transparent)]
    Review(#[from] ReviewServiceError),

    /// The issue tracker failed outside a service.
    #[error(transparent)]
    Tracker(#[from] TrackerError),

    /// Committing or merging failed.
    #[error(transparent)]
    Publish(#[from] PublishError),

    /// The registry had no record for any requested identifier.
    #[error("registry has no record for {}", join(.identifiers))]
    NoRegistryData {
        /// Requested identifiers.
        identifiers: Vec<Doi>,
    },
}

fn join(identifiers: &[Doi]) -> String {
    identifiers
        .iter()
        .map(Doi::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for curator runs.
pub type CuratorResult<T> = Result<T, CuratorError>;

/// How a run ended, as seen by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The run completed.
    Success,
    /// An external data source had nothing for the requested identifiers.
    DataError,
    /// Any other fault.
    Failure,
}

impl RunOutcome {
    /// Returns the process exit status.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::DataError => 65,
            Self::Failure => 1,
        }
    }
}

impl From<RunOutcome> for ExitCode {
    fn from(outcome: RunOutcome) -> Self {
        Self::from(outcome.code())
    }
}

impl CuratorError {
    /// Maps the error onto the exit-code contract.
    #[must_use]
    pub const fn classify(&self) -> RunOutcome {
        match self {
            Self::NoRegistryData { .. } => RunOutcome::DataError,
            _ => RunOutcome::Failure,
        }
    }
}
