//! Service layer for review request handling.

pub mod quota;
pub mod transition;

pub use quota::{RateLimitGate, RateLimitPolicy};
pub use transition::{Decision, ReviewServiceError, ReviewServiceResult, ReviewTransitionService};
