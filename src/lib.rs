//! Atelier: project collaboration and task-state engine.
//!
//! This crate manages who belongs to a project and what they are working
//! on: a four-level role model, an email invitation workflow, a membership
//! store, a kanban task state machine with derived progress, and a
//! snapshot synchronization layer that pushes complete collections to
//! observers after every committed change.
//!
//! # Architecture
//!
//! Atelier follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence
//! - **Adapters**: Concrete implementations of ports (in-memory stores)
//!
//! # Modules
//!
//! - [`team`]: Projects, roles, memberships, and invitations
//! - [`task`]: Task lifecycle, checklists, and kanban boards
//! - [`sync`]: Snapshot subscriptions per project and per email
//! - [`config`]: Validation limits
//! - [`error`]: Error classification shared by every service

pub mod config;
pub mod error;
pub mod sync;
pub mod task;
pub mod team;

pub use error::ErrorKind;
