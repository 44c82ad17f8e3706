//! Publishing collection changes through version control.
//!
//! Every batch of collection writes becomes one commit on the review
//! branch, merged into the main branch by a merge request, after which both
//! branches are resynchronized.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
