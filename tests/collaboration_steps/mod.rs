//! Step definitions shared by the collaboration and task progress scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
