//! Failure taxonomy shared by every command in the engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse classification of a command failure.
///
/// Service error enums carry the detail; callers that only need to decide
/// on user-facing messaging match on the kind returned by their `kind()`
/// method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// An identifier did not resolve to an entity.
    NotFound,
    /// The acting user's role lacks the required capability.
    Forbidden,
    /// The operation is not valid for the entity's current state.
    InvalidState,
    /// The invitation is past its expiry.
    Expired,
    /// An entity with the same identity already exists.
    AlreadyExists,
    /// The email or user already holds an active membership.
    AlreadyMember,
    /// An outstanding invitation already exists for the email.
    DuplicatePending,
    /// The accepting identity does not own the invited email.
    EmailMismatch,
    /// Input failed validation.
    Validation,
    /// The persistence boundary failed.
    Persistence,
}

impl ErrorKind {
    /// Returns the canonical snake-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::InvalidState => "invalid_state",
            Self::Expired => "expired",
            Self::AlreadyExists => "already_exists",
            Self::AlreadyMember => "already_member",
            Self::DuplicatePending => "duplicate_pending",
            Self::EmailMismatch => "email_mismatch",
            Self::Validation => "validation",
            Self::Persistence => "persistence",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
