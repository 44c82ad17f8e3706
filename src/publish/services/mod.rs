//! Service layer for publishing.

pub mod cycle;

pub use cycle::{PublishCycle, PublishError, PublishResult};
