//! Bibwarden: a reviewed bibliography pipeline.
//!
//! Candidate publications are discovered by crawling the references and
//! citations of accepted ones, proposed to a maintainer as review requests
//! on an issue tracker, and filed as in scope or not once the maintainer
//! answers `yes` or `no`. Every change to the collections is committed
//! through a merged review branch.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (files, HTTP, git)
//!
//! # Modules
//!
//! - [`bibliography`]: Records, collections and identity resolution
//! - [`review`]: Review requests and the review state machine
//! - [`discovery`]: Reference expansion and intake
//! - [`publish`]: Commit, merge and resynchronization
//! - [`curator`]: Command orchestration and exit codes

pub mod bibliography;
pub mod config;
pub mod curator;
pub mod discovery;
pub mod publish;
pub mod review;
pub mod telemetry;
