//! Run orchestration.
//!
//! A [`Curator`] executes one command per process: it refuses a dirty
//! working copy, loads the record store once, applies the command to that
//! snapshot and publishes the result. [`CuratorError::classify`] maps the
//! outcome onto the exit-code contract.

mod error;
mod run;
mod stack;
mod wiring;

pub use error::{CuratorError, CuratorResult, RunOutcome};
pub use run::{CheckOutcome, Curator, CuratorSettings, INTAKE_ORIGIN, ReferenceCheck};
pub use stack::{Adapters, Stack};
pub use wiring::{InMemory, Production, WiringError};

#[cfg(test)]
mod tests;
