//! Port contracts for team management.
//!
//! Ports define infrastructure-agnostic interfaces used by team services.

pub mod repository;

pub use repository::{TeamRepository, TeamRepositoryError, TeamRepositoryResult};
