//! Adapter implementations for discovery and intake.

pub mod crossref;
pub mod fs;
pub mod memory;
pub mod openalex;

pub use crossref::CrossrefClient;
pub use fs::FileLedgerStore;
pub use memory::{InMemoryCitationGraph, InMemoryLedgerStore, InMemoryRegistry};
pub use openalex::OpenAlexClient;
