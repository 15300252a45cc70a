//! Errors shared by the membership and invitation services.

use crate::error::ErrorKind;
use crate::team::{
    domain::{
        EmailAddress, InvitationId, InvitationStatus, MemberId, ProjectId, Role, TeamDomainError,
        UserId,
    },
    ports::TeamRepositoryError,
};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Team operation an actor attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamAction {
    /// Issue an invitation.
    Invite,
    /// Add a member directly.
    AddMember,
    /// Change a member's role.
    ChangeRole,
    /// Remove another member.
    RemoveMember,
    /// Remove oneself through the member-removal path.
    RemoveSelf,
}

impl TeamAction {
    /// Returns a short human-readable description.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invite => "invite members",
            Self::AddMember => "add members",
            Self::ChangeRole => "change this role",
            Self::RemoveMember => "remove this member",
            Self::RemoveSelf => "remove themselves",
        }
    }
}

impl fmt::Display for TeamAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service-level errors for membership and invitation operations.
#[derive(Debug, Error)]
pub enum TeamServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TeamDomainError),

    /// The project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// A project with the same identifier already exists.
    #[error("duplicate project identifier: {0}")]
    DuplicateProject(ProjectId),

    /// The membership row does not exist, belongs to another project, or
    /// was removed.
    #[error("member not found: {0}")]
    MemberNotFound(MemberId),

    /// The invitation does not exist.
    #[error("invitation not found: {0}")]
    InvitationNotFound(InvitationId),

    /// The acting user has no active membership in the project.
    #[error("user {user_id} is not an active member of project {project_id}")]
    NotAMember {
        /// Target project.
        project_id: ProjectId,
        /// Acting user.
        user_id: UserId,
    },

    /// The acting user's role lacks the capability.
    #[error("{role} may not {action}")]
    Forbidden {
        /// Attempted operation.
        action: TeamAction,
        /// Acting user's role.
        role: Role,
    },

    /// The invitation was already answered.
    #[error("invitation {id} is {status}, not pending")]
    InvitationNotPending {
        /// Invitation identifier.
        id: InvitationId,
        /// Current status.
        status: InvitationStatus,
    },

    /// The change would leave the project without an owner.
    #[error("project {0} must keep at least one owner")]
    LastOwner(ProjectId),

    /// The invitation is past its expiry.
    #[error("invitation {0} has expired")]
    Expired(InvitationId),

    /// The email already holds an active membership.
    #[error("{email} is already a member of project {project_id}")]
    AlreadyMember {
        /// Target project.
        project_id: ProjectId,
        /// Email of the existing member.
        email: EmailAddress,
    },

    /// An unexpired pending invitation already exists.
    #[error("a pending invitation for {email} already exists in project {project_id}")]
    DuplicatePending {
        /// Target project.
        project_id: ProjectId,
        /// Invited email.
        email: EmailAddress,
    },

    /// The responding identity's email differs from the invited email.
    #[error("invitation {0} is addressed to a different email")]
    EmailMismatch(InvitationId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TeamServiceError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) => ErrorKind::Validation,
            Self::ProjectNotFound(_) | Self::MemberNotFound(_) | Self::InvitationNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::DuplicateProject(_) => ErrorKind::AlreadyExists,
            Self::NotAMember { .. } | Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::InvitationNotPending { .. } | Self::LastOwner(_) => ErrorKind::InvalidState,
            Self::Expired(_) => ErrorKind::Expired,
            Self::AlreadyMember { .. } => ErrorKind::AlreadyMember,
            Self::DuplicatePending { .. } => ErrorKind::DuplicatePending,
            Self::EmailMismatch(_) => ErrorKind::EmailMismatch,
            Self::Persistence(_) => ErrorKind::Persistence,
        }
    }
}

impl From<TeamRepositoryError> for TeamServiceError {
    fn from(err: TeamRepositoryError) -> Self {
        match err {
            TeamRepositoryError::DuplicateProject(id) => Self::DuplicateProject(id),
            TeamRepositoryError::MemberNotFound(id) => Self::MemberNotFound(id),
            TeamRepositoryError::InvitationNotFound(id) => Self::InvitationNotFound(id),
            TeamRepositoryError::AlreadyMember { project_id, email } => {
                Self::AlreadyMember { project_id, email }
            }
            TeamRepositoryError::DuplicatePending { project_id, email } => {
                Self::DuplicatePending { project_id, email }
            }
            TeamRepositoryError::InvitationNotPending { id, status } => {
                Self::InvitationNotPending { id, status }
            }
            TeamRepositoryError::Persistence(source) => Self::Persistence(source),
        }
    }
}

/// Result type for team service operations.
pub type TeamServiceResult<T> = Result<T, TeamServiceError>;
