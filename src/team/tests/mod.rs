//! Unit tests for the team module.
