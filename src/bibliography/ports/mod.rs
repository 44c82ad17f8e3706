//! Port contracts for the record store.

pub mod store;

pub use store::{RecordStore, RecordStoreError, RecordStoreResult};
