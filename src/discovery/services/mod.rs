//! Service layer for discovery and intake.

pub mod expansion;
pub mod intake;
pub mod report;

pub use expansion::{Expansion, ExpansionService};
pub use intake::{Admitted, IntakeError, IntakeReport, IntakeResult, IntakeService};
