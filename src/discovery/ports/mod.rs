//! Port contracts for discovery and intake.

pub mod citations;
pub mod ledger;
pub mod registry;

pub use citations::{CitationError, CitationGraph, CitationLinks, CitationResult};
pub use ledger::{LedgerError, LedgerResult, LedgerStore};
pub use registry::{MetadataRegistry, RegistryEntry, RegistryError, RegistryResult, Resolution};

#[cfg(test)]
pub use citations::MockCitationGraph;
#[cfg(test)]
pub use registry::MockMetadataRegistry;
