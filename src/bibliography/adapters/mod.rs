//! Adapter implementations for the record store port.

pub mod fs;
pub mod memory;

pub use fs::FileRecordStore;
pub use memory::InMemoryRecordStore;
