//! Error types for team domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing team domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TeamDomainError {
    /// The user identifier is empty after trimming.
    #[error("user id must not be empty")]
    EmptyUserId,

    /// The email address is not of the form `local@domain.tld`.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),

    /// The display name is empty after trimming.
    #[error("display name must not be empty")]
    EmptyDisplayName,

    /// The display name exceeds the configured limit.
    #[error("display name exceeds {limit} character limit")]
    DisplayNameTooLong {
        /// Configured maximum length.
        limit: usize,
    },

    /// The project name is empty after trimming.
    #[error("project name must not be empty")]
    EmptyProjectName,

    /// The project name exceeds the configured limit.
    #[error("project name exceeds {limit} character limit")]
    ProjectNameTooLong {
        /// Configured maximum length.
        limit: usize,
    },

    /// Invitations cannot grant the owner role.
    #[error("invitations cannot grant the owner role")]
    OwnerInvitation,
}

/// Error returned while parsing roles from persistence or input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown member role: {0}")]
pub struct ParseRoleError(pub String);

/// Error returned while parsing member status from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown member status: {0}")]
pub struct ParseMemberStatusError(pub String);

/// Error returned while parsing invitation status from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown invitation status: {0}")]
pub struct ParseInvitationStatusError(pub String);

/// Error returned when an invitation transition starts from a non-pending
/// status.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("invitation is {0}, not pending")]
pub struct InvitationNotPending(pub super::InvitationStatus);
