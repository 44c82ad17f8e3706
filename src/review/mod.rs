//! Review requests and the review lifecycle.
//!
//! Every record in `in-review` has one tracked review request. A
//! maintainer answers `yes` or `no`; the transition engine moves the record
//! and relabels or closes the request.
//!
//! - Domain types and the pure state machine in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Transition and rate-limit services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
