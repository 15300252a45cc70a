//! Repository port for projects, memberships, and invitations.

use crate::team::domain::{
    EmailAddress, Invitation, InvitationId, InvitationStatus, Member, MemberId, Project,
    ProjectId, UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for team repository operations.
pub type TeamRepositoryResult<T> = Result<T, TeamRepositoryError>;

/// Team persistence contract.
///
/// Every method is atomic: implementations either apply the whole mutation
/// or none of it. Uniqueness rules are enforced here, inside the same write
/// as the insert, so that concurrent callers cannot both pass a check.
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Stores a new project together with its founding owner membership.
    ///
    /// # Errors
    ///
    /// Returns [`TeamRepositoryError::DuplicateProject`] when the project ID
    /// already exists.
    async fn store_project(&self, project: &Project, owner: &Member) -> TeamRepositoryResult<()>;

    /// Finds a project by identifier.
    async fn find_project(&self, id: ProjectId) -> TeamRepositoryResult<Option<Project>>;

    /// Inserts a new active membership.
    ///
    /// # Errors
    ///
    /// Returns [`TeamRepositoryError::AlreadyMember`] when the project
    /// already has an active row for the same user or email.
    async fn insert_member(&self, member: &Member) -> TeamRepositoryResult<()>;

    /// Persists role or status changes to an existing membership.
    ///
    /// # Errors
    ///
    /// Returns [`TeamRepositoryError::MemberNotFound`] when the row does not
    /// exist.
    async fn update_member(&self, member: &Member) -> TeamRepositoryResult<()>;

    /// Finds a membership row by identifier, whatever its status.
    async fn find_member(&self, id: MemberId) -> TeamRepositoryResult<Option<Member>>;

    /// Finds the active membership of `user_id` in a project.
    async fn find_active_member(
        &self,
        project_id: ProjectId,
        user_id: &UserId,
    ) -> TeamRepositoryResult<Option<Member>>;

    /// Returns the active members of a project, oldest first.
    async fn active_members(&self, project_id: ProjectId) -> TeamRepositoryResult<Vec<Member>>;

    /// Stores a new pending invitation.
    ///
    /// # Errors
    ///
    /// Returns [`TeamRepositoryError::AlreadyMember`] when the invited email
    /// belongs to an active member, or
    /// [`TeamRepositoryError::DuplicatePending`] when a pending invitation
    /// for the same project and email is still unexpired at the new
    /// invitation's creation time.
    async fn store_invitation(&self, invitation: &Invitation) -> TeamRepositoryResult<()>;

    /// Finds an invitation by identifier.
    async fn find_invitation(&self, id: InvitationId) -> TeamRepositoryResult<Option<Invitation>>;

    /// Persists a status change on a pending invitation.
    ///
    /// # Errors
    ///
    /// Returns [`TeamRepositoryError::InvitationNotFound`] when absent, or
    /// [`TeamRepositoryError::InvitationNotPending`] when the stored row was
    /// already answered.
    async fn update_invitation(&self, invitation: &Invitation) -> TeamRepositoryResult<()>;

    /// Marks an invitation accepted and inserts the resulting membership in
    /// one atomic write.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::update_invitation`] and
    /// [`Self::insert_member`]; on any error neither write is applied.
    async fn accept_invitation(
        &self,
        invitation: &Invitation,
        member: &Member,
    ) -> TeamRepositoryResult<()>;

    /// Returns pending invitations for `email` that are unexpired at `now`,
    /// oldest first.
    async fn pending_invitations_for_email(
        &self,
        email: &EmailAddress,
        now: DateTime<Utc>,
    ) -> TeamRepositoryResult<Vec<Invitation>>;
}

/// Errors returned by team repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TeamRepositoryError {
    /// A project with the same identifier already exists.
    #[error("duplicate project identifier: {0}")]
    DuplicateProject(ProjectId),

    /// The membership row was not found.
    #[error("member not found: {0}")]
    MemberNotFound(MemberId),

    /// The invitation was not found.
    #[error("invitation not found: {0}")]
    InvitationNotFound(InvitationId),

    /// The user or email already holds an active membership.
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

    /// The stored invitation is no longer pending.
    #[error("invitation {id} is {status}, not pending")]
    InvitationNotPending {
        /// Invitation identifier.
        id: InvitationId,
        /// Stored status.
        status: InvitationStatus,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TeamRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
