//! Kanban task management for project teams.
//!
//! Tasks belong to a project, move freely between the four board columns,
//! and track subtasks (which drive a derived progress percentage) and
//! requirements (which do not). Only owners, admins, and members may edit
//! tasks; viewers are read-only. The module follows hexagonal architecture:
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
