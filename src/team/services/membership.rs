//! Service layer for projects and their memberships.

use super::{
    TeamAction, TeamServiceError, TeamServiceResult,
    notify::publish_members,
};
use crate::config::TeamLimits;
use crate::sync::{KeyedLocks, SnapshotCallback, Subscription, SyncHub};
use crate::team::{
    domain::{Identity, Member, MemberId, Project, ProjectId, ProjectName, Role, UserId},
    ports::TeamRepository,
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{info, warn};

/// Project membership orchestration service.
///
/// Membership changes within one project are serialized, so role and
/// owner-count checks always see the latest committed roster.
#[derive(Clone)]
pub struct MembershipService<R, C>
where
    R: TeamRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    hub: SyncHub,
    limits: TeamLimits,
    locks: Arc<KeyedLocks<ProjectId>>,
}

impl<R, C> MembershipService<R, C>
where
    R: TeamRepository,
    C: Clock + Send + Sync,
{
    /// Creates a membership service with default limits.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>, hub: SyncHub) -> Self {
        Self {
            repository,
            clock,
            hub,
            limits: TeamLimits::default(),
            locks: Arc::new(KeyedLocks::new()),
        }
    }

    /// Replaces the validation limits.
    #[must_use]
    pub const fn with_limits(mut self, limits: TeamLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Creates a project owned by `owner`, who becomes its first active
    /// member.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::Domain`] when the project name or owner
    /// display name fails validation, or a repository error when
    /// persistence fails.
    pub async fn create_project(
        &self,
        owner: &Identity,
        name: impl Into<String>,
    ) -> TeamServiceResult<Project> {
        let project_name = ProjectName::new(name, self.limits.max_project_name_length)?;
        owner.check_display_name(self.limits.max_display_name_length)?;

        let project = Project::new(project_name, owner.user_id().clone(), &*self.clock);
        let founder = Member::join(
            project.id(),
            owner,
            Role::Owner,
            owner.user_id().clone(),
            &*self.clock,
        );
        self.repository.store_project(&project, &founder).await?;
        info!(project_id = %project.id(), owner = %owner.user_id(), "project created");

        publish_members(&self.hub, &*self.repository, project.id()).await?;
        Ok(project)
    }

    /// Finds a project by identifier.
    ///
    /// # Errors
    ///
    /// Returns a repository error when the lookup fails.
    pub async fn find_project(&self, project_id: ProjectId) -> TeamServiceResult<Option<Project>> {
        Ok(self.repository.find_project(project_id).await?)
    }

    /// Adds `identity` directly as an active member with `role`.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::NotAMember`] or
    /// [`TeamServiceError::Forbidden`] when `actor` may not grant `role`,
    /// and [`TeamServiceError::AlreadyMember`] when the user or email is
    /// already active in the project.
    pub async fn add_member(
        &self,
        actor: &UserId,
        project_id: ProjectId,
        identity: &Identity,
        role: Role,
    ) -> TeamServiceResult<Member> {
        let _guard = self.locks.lock(project_id).await;
        self.require_project(project_id).await?;
        let acting = self.acting_member(project_id, actor).await?;
        if !acting.role().can_manage_members() || !acting.role().can_assign_role(role) {
            return Err(forbidden(TeamAction::AddMember, &acting));
        }
        identity.check_display_name(self.limits.max_display_name_length)?;

        let member = Member::join(project_id, identity, role, actor.clone(), &*self.clock);
        self.repository.insert_member(&member).await?;
        info!(
            project_id = %project_id,
            member_id = %member.id(),
            role = %role,
            added_by = %actor,
            "member added"
        );

        publish_members(&self.hub, &*self.repository, project_id).await?;
        Ok(member)
    }

    /// Changes the role of an active member.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::Forbidden`] when `actor` may not move the
    /// target from its current role to `role`,
    /// [`TeamServiceError::MemberNotFound`] when the target is not an active
    /// member of the project, and [`TeamServiceError::LastOwner`] when the
    /// change would leave the project without an owner.
    pub async fn update_role(
        &self,
        actor: &UserId,
        project_id: ProjectId,
        member_id: MemberId,
        role: Role,
    ) -> TeamServiceResult<Member> {
        let _guard = self.locks.lock(project_id).await;
        let acting = self.acting_member(project_id, actor).await?;
        let mut target = self.active_target(project_id, member_id).await?;
        if !acting.role().can_change_role(target.role(), role) {
            return Err(forbidden(TeamAction::ChangeRole, &acting));
        }
        if target.role() == role {
            return Ok(target);
        }
        if target.role() == Role::Owner && self.owner_count(project_id).await? <= 1 {
            warn!(project_id = %project_id, member_id = %member_id, "refusing to demote last owner");
            return Err(TeamServiceError::LastOwner(project_id));
        }

        let previous = target.role();
        target.set_role(role);
        self.repository.update_member(&target).await?;
        info!(
            project_id = %project_id,
            member_id = %member_id,
            from = %previous,
            to = %role,
            changed_by = %actor,
            "member role changed"
        );

        publish_members(&self.hub, &*self.repository, project_id).await?;
        Ok(target)
    }

    /// Removes an active member from the project.
    ///
    /// The membership row is kept with status `removed`.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::Forbidden`] when `actor` targets
    /// themselves, an owner, or a role they may not manage, and
    /// [`TeamServiceError::MemberNotFound`] when the target is not an active
    /// member of the project.
    pub async fn remove(
        &self,
        actor: &UserId,
        project_id: ProjectId,
        member_id: MemberId,
    ) -> TeamServiceResult<Member> {
        let _guard = self.locks.lock(project_id).await;
        let acting = self.acting_member(project_id, actor).await?;
        let mut target = self.active_target(project_id, member_id).await?;
        if target.user_id() == actor {
            return Err(forbidden(TeamAction::RemoveSelf, &acting));
        }
        if !acting.role().can_remove_member(target.role()) {
            return Err(forbidden(TeamAction::RemoveMember, &acting));
        }

        target.mark_removed();
        self.repository.update_member(&target).await?;
        info!(
            project_id = %project_id,
            member_id = %member_id,
            removed_by = %actor,
            "member removed"
        );

        publish_members(&self.hub, &*self.repository, project_id).await?;
        Ok(target)
    }

    /// Returns the active members of a project, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a repository error when the lookup fails.
    pub async fn list_active(&self, project_id: ProjectId) -> TeamServiceResult<Vec<Member>> {
        Ok(self.repository.active_members(project_id).await?)
    }

    /// Returns the role of `user_id` in the project, or `None` when they are
    /// not an active member.
    ///
    /// # Errors
    ///
    /// Returns a repository error when the lookup fails.
    pub async fn get_role(
        &self,
        project_id: ProjectId,
        user_id: &UserId,
    ) -> TeamServiceResult<Option<Role>> {
        let member = self
            .repository
            .find_active_member(project_id, user_id)
            .await?;
        Ok(member.map(|found| found.role()))
    }

    /// Returns whether `user_id` is an active member of the project.
    ///
    /// # Errors
    ///
    /// Returns a repository error when the lookup fails.
    pub async fn is_member(&self, project_id: ProjectId, user_id: &UserId) -> TeamServiceResult<bool> {
        Ok(self.get_role(project_id, user_id).await?.is_some())
    }

    /// Subscribes to the active member list of a project.
    ///
    /// `callback` receives the current list immediately and again after
    /// every committed membership change in the project.
    ///
    /// # Errors
    ///
    /// Returns a repository error when the initial snapshot cannot be
    /// loaded.
    pub async fn subscribe_members(
        &self,
        project_id: ProjectId,
        callback: SnapshotCallback<Member>,
    ) -> TeamServiceResult<Subscription> {
        let repository = &*self.repository;
        let subscription = self
            .hub
            .members()
            .subscribe(project_id, callback, || repository.active_members(project_id))
            .await?;
        Ok(subscription)
    }

    async fn require_project(&self, project_id: ProjectId) -> TeamServiceResult<Project> {
        self.repository
            .find_project(project_id)
            .await?
            .ok_or(TeamServiceError::ProjectNotFound(project_id))
    }

    async fn acting_member(
        &self,
        project_id: ProjectId,
        actor: &UserId,
    ) -> TeamServiceResult<Member> {
        self.repository
            .find_active_member(project_id, actor)
            .await?
            .ok_or_else(|| TeamServiceError::NotAMember {
                project_id,
                user_id: actor.clone(),
            })
    }

    async fn active_target(
        &self,
        project_id: ProjectId,
        member_id: MemberId,
    ) -> TeamServiceResult<Member> {
        self.repository
            .find_member(member_id)
            .await?
            .filter(|member| member.project_id() == project_id && member.is_active())
            .ok_or(TeamServiceError::MemberNotFound(member_id))
    }

    async fn owner_count(&self, project_id: ProjectId) -> TeamServiceResult<usize> {
        let members = self.repository.active_members(project_id).await?;
        Ok(members
            .iter()
            .filter(|member| member.role() == Role::Owner)
            .count())
    }
}

fn forbidden(action: TeamAction, acting: &Member) -> TeamServiceError {
    warn!(
        project_id = %acting.project_id(),
        user_id = %acting.user_id(),
        role = %acting.role(),
        action = %action,
        "team action forbidden"
    );
    TeamServiceError::Forbidden {
        action,
        role: acting.role(),
    }
}
