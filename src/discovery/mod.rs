//! Discovery of candidate publications and their intake.
//!
//! Expansion crawls an accepted publication's references and citations;
//! intake turns each new identifier into an `in-review` record with a
//! review request. Identifiers that cannot be classified go to the pending
//! ledger.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
