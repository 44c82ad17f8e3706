//! Domain model for reference discovery and intake.

mod batch;
mod error;
mod ledger;
mod reference;

pub use batch::{BatchSize, DoiBatch, MAX_BATCH};
pub use error::DiscoveryDomainError;
pub use ledger::{PendingEntry, PendingKind, PendingLedger};
pub use reference::{Reference, ReferenceOrigin, ReferenceSplit, partition};
