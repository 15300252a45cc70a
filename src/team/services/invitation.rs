//! Service layer for the invitation workflow.

use super::{
    TeamAction, TeamServiceError, TeamServiceResult,
    notify::{publish_invitations, publish_members},
};
use crate::config::TeamLimits;
use crate::sync::{SnapshotCallback, Subscription, SyncHub};
use crate::team::{
    domain::{
        EmailAddress, Identity, Invitation, InvitationId, InvitationRole, InvitationStatus,
        Member, ProjectId,
    },
    ports::TeamRepository,
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{info, warn};

/// Invitation workflow orchestration service.
///
/// Uniqueness of pending invitations and the single-acceptance rule are
/// enforced atomically by the repository, so this service holds no locks.
#[derive(Clone)]
pub struct InvitationService<R, C>
where
    R: TeamRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    hub: SyncHub,
    limits: TeamLimits,
}

impl<R, C> InvitationService<R, C>
where
    R: TeamRepository,
    C: Clock + Send + Sync,
{
    /// Creates an invitation service with default limits.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>, hub: SyncHub) -> Self {
        Self {
            repository,
            clock,
            hub,
            limits: TeamLimits::default(),
        }
    }

    /// Replaces the validation limits.
    #[must_use]
    pub const fn with_limits(mut self, limits: TeamLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Invites `email` to the project with `role`, on behalf of `inviter`.
    ///
    /// The invitation expires seven days after creation.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::Domain`] for a malformed email,
    /// [`TeamServiceError::ProjectNotFound`] when the project does not
    /// exist, [`TeamServiceError::NotAMember`] or
    /// [`TeamServiceError::Forbidden`] when `inviter` may not grant `role`,
    /// [`TeamServiceError::AlreadyMember`] when the email is already an
    /// active member, and [`TeamServiceError::DuplicatePending`] when an
    /// unexpired pending invitation already exists.
    pub async fn invite(
        &self,
        inviter: &Identity,
        project_id: ProjectId,
        email: &str,
        role: InvitationRole,
    ) -> TeamServiceResult<Invitation> {
        let invited_email = EmailAddress::new(email)?;
        let project = self
            .repository
            .find_project(project_id)
            .await?
            .ok_or(TeamServiceError::ProjectNotFound(project_id))?;
        let acting = self
            .repository
            .find_active_member(project_id, inviter.user_id())
            .await?
            .ok_or_else(|| TeamServiceError::NotAMember {
                project_id,
                user_id: inviter.user_id().clone(),
            })?;
        if !acting.role().can_manage_members() || !acting.role().can_assign_role(role.role()) {
            warn!(
                project_id = %project_id,
                user_id = %inviter.user_id(),
                role = %acting.role(),
                requested = %role,
                "invitation forbidden"
            );
            return Err(TeamServiceError::Forbidden {
                action: TeamAction::Invite,
                role: acting.role(),
            });
        }

        let invitation = Invitation::issue(&project, invited_email, role, inviter, &*self.clock);
        self.repository.store_invitation(&invitation).await?;
        info!(
            invitation_id = %invitation.id(),
            project_id = %project_id,
            role = %role,
            invited_by = %inviter.user_id(),
            "invitation issued"
        );

        publish_invitations(
            &self.hub,
            &*self.repository,
            &*self.clock,
            invitation.invited_email(),
        )
        .await?;
        Ok(invitation)
    }

    /// Accepts a pending invitation as `identity`, creating an active
    /// membership with the invited role.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::InvitationNotFound`] when absent,
    /// [`TeamServiceError::InvitationNotPending`] when already answered
    /// (including by a concurrent acceptance),
    /// [`TeamServiceError::EmailMismatch`] when `identity` is not the
    /// invited email, [`TeamServiceError::Expired`] when past expiry, and
    /// [`TeamServiceError::AlreadyMember`] when `identity` is already an
    /// active member of the project.
    pub async fn accept(
        &self,
        invitation_id: InvitationId,
        identity: &Identity,
    ) -> TeamServiceResult<Member> {
        let mut invitation = self.pending_invitation(invitation_id).await?;
        if identity.email() != invitation.invited_email() {
            return Err(TeamServiceError::EmailMismatch(invitation_id));
        }
        if invitation.is_expired(self.clock.utc()) {
            info!(invitation_id = %invitation_id, "expired invitation rejected");
            return Err(TeamServiceError::Expired(invitation_id));
        }
        identity.check_display_name(self.limits.max_display_name_length)?;

        let member = Member::join(
            invitation.project_id(),
            identity,
            invitation.role().role(),
            invitation.invited_by().clone(),
            &*self.clock,
        );
        invitation
            .mark_accepted()
            .map_err(|err| TeamServiceError::InvitationNotPending {
                id: invitation_id,
                status: err.0,
            })?;
        self.repository
            .accept_invitation(&invitation, &member)
            .await?;
        info!(
            invitation_id = %invitation_id,
            project_id = %invitation.project_id(),
            member_id = %member.id(),
            "invitation accepted"
        );

        publish_members(&self.hub, &*self.repository, invitation.project_id()).await?;
        publish_invitations(
            &self.hub,
            &*self.repository,
            &*self.clock,
            invitation.invited_email(),
        )
        .await?;
        Ok(member)
    }

    /// Declines a pending invitation as `identity`.
    ///
    /// Expired invitations may still be declined.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::InvitationNotFound`] when absent,
    /// [`TeamServiceError::InvitationNotPending`] when already answered, and
    /// [`TeamServiceError::EmailMismatch`] when `identity` is not the
    /// invited email.
    pub async fn decline(
        &self,
        invitation_id: InvitationId,
        identity: &Identity,
    ) -> TeamServiceResult<Invitation> {
        let mut invitation = self.pending_invitation(invitation_id).await?;
        if identity.email() != invitation.invited_email() {
            return Err(TeamServiceError::EmailMismatch(invitation_id));
        }

        invitation
            .mark_declined()
            .map_err(|err| TeamServiceError::InvitationNotPending {
                id: invitation_id,
                status: err.0,
            })?;
        self.repository.update_invitation(&invitation).await?;
        info!(invitation_id = %invitation_id, "invitation declined");

        publish_invitations(
            &self.hub,
            &*self.repository,
            &*self.clock,
            invitation.invited_email(),
        )
        .await?;
        Ok(invitation)
    }

    /// Returns outstanding invitations addressed to `email`, oldest first.
    ///
    /// Expired invitations are excluded.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::Domain`] for a malformed email, or a
    /// repository error when the lookup fails.
    pub async fn list_pending_for_email(&self, email: &str) -> TeamServiceResult<Vec<Invitation>> {
        let address = EmailAddress::new(email)?;
        Ok(self
            .repository
            .pending_invitations_for_email(&address, self.clock.utc())
            .await?)
    }

    /// Finds an invitation by identifier, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns a repository error when the lookup fails.
    pub async fn find_invitation(
        &self,
        invitation_id: InvitationId,
    ) -> TeamServiceResult<Option<Invitation>> {
        Ok(self.repository.find_invitation(invitation_id).await?)
    }

    /// Subscribes to the outstanding invitations addressed to `email`.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::Domain`] for a malformed email, or a
    /// repository error when the initial snapshot cannot be loaded.
    pub async fn subscribe_invitations(
        &self,
        email: &str,
        callback: SnapshotCallback<Invitation>,
    ) -> TeamServiceResult<Subscription> {
        let address = EmailAddress::new(email)?;
        let repository = &*self.repository;
        let clock = &*self.clock;
        let subscription = self
            .hub
            .invitations()
            .subscribe(address.clone(), callback, || {
                repository.pending_invitations_for_email(&address, clock.utc())
            })
            .await?;
        Ok(subscription)
    }

    async fn pending_invitation(&self, invitation_id: InvitationId) -> TeamServiceResult<Invitation> {
        let invitation = self
            .repository
            .find_invitation(invitation_id)
            .await?
            .ok_or(TeamServiceError::InvitationNotFound(invitation_id))?;
        if invitation.status() != InvitationStatus::Pending {
            return Err(TeamServiceError::InvitationNotPending {
                id: invitation_id,
                status: invitation.status(),
            });
        }
        Ok(invitation)
    }
}
