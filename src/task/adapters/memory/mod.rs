//! In-memory adapters used by tests and embedded deployments.

mod task;

pub use task::InMemoryTaskRepository;
