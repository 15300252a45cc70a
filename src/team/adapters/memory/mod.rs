//! In-memory adapters used by tests and embedded deployments.

mod team;

pub use team::InMemoryTeamRepository;
