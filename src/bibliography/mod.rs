//! Record store and identity resolution.
//!
//! Four disjoint collections of bibliographic records persisted as BibTeX
//! files. A run works on one [`domain::WorkingSet`] snapshot that answers
//! "is this identifier already known?" and hands out collision-free keys.
//!
//! - Domain types in [`domain`]
//! - BibTeX codec in [`codec`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Snapshot loading and flushing in [`services`]

pub mod adapters;
pub mod codec;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
