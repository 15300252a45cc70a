//! Project teams: roles, memberships, and invitations.
//!
//! A project always has at least one owner. Members join either directly,
//! added by an owner or admin, or by accepting an invitation addressed to
//! their email. Removed members keep their row with status `removed` so
//! the project history stays intact. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
