//! In-memory repository for projects, memberships, and invitations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::team::{
    domain::{
        EmailAddress, Invitation, InvitationId, InvitationStatus, Member, MemberId, Project,
        ProjectId, UserId,
    },
    ports::{TeamRepository, TeamRepositoryError, TeamRepositoryResult},
};

/// Thread-safe in-memory team repository.
///
/// Members and invitations are kept in insertion order so listings are
/// stable.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTeamRepository {
    state: Arc<RwLock<InMemoryTeamState>>,
}

#[derive(Debug, Default)]
struct InMemoryTeamState {
    projects: HashMap<ProjectId, Project>,
    members: HashMap<MemberId, Member>,
    member_order: Vec<MemberId>,
    invitations: HashMap<InvitationId, Invitation>,
    invitation_order: Vec<InvitationId>,
}

impl InMemoryTeamState {
    fn ordered_members(&self) -> impl Iterator<Item = &Member> {
        self.member_order
            .iter()
            .filter_map(|id| self.members.get(id))
    }

    fn ordered_invitations(&self) -> impl Iterator<Item = &Invitation> {
        self.invitation_order
            .iter()
            .filter_map(|id| self.invitations.get(id))
    }

    fn has_active_email(&self, project_id: ProjectId, email: &EmailAddress) -> bool {
        self.ordered_members().any(|member| {
            member.is_active() && member.project_id() == project_id && member.email() == email
        })
    }

    fn check_member_unique(&self, member: &Member) -> TeamRepositoryResult<()> {
        let clash = self.ordered_members().any(|existing| {
            existing.is_active()
                && existing.id() != member.id()
                && existing.project_id() == member.project_id()
                && (existing.user_id() == member.user_id() || existing.email() == member.email())
        });
        if clash {
            return Err(TeamRepositoryError::AlreadyMember {
                project_id: member.project_id(),
                email: member.email().clone(),
            });
        }
        Ok(())
    }

    fn check_invitation_pending(&self, invitation: &Invitation) -> TeamRepositoryResult<()> {
        let stored = self
            .invitations
            .get(&invitation.id())
            .ok_or(TeamRepositoryError::InvitationNotFound(invitation.id()))?;
        if stored.status() != InvitationStatus::Pending {
            return Err(TeamRepositoryError::InvitationNotPending {
                id: stored.id(),
                status: stored.status(),
            });
        }
        Ok(())
    }

    fn push_member(&mut self, member: &Member) {
        self.member_order.push(member.id());
        self.members.insert(member.id(), member.clone());
    }
}

impl InMemoryTeamRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TeamRepositoryResult<RwLockReadGuard<'_, InMemoryTeamState>> {
        self.state.read().map_err(|err| {
            TeamRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TeamRepositoryResult<RwLockWriteGuard<'_, InMemoryTeamState>> {
        self.state.write().map_err(|err| {
            TeamRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    async fn store_project(&self, project: &Project, owner: &Member) -> TeamRepositoryResult<()> {
        let mut state = self.write()?;
        if state.projects.contains_key(&project.id()) {
            return Err(TeamRepositoryError::DuplicateProject(project.id()));
        }
        state.projects.insert(project.id(), project.clone());
        state.push_member(owner);
        Ok(())
    }

    async fn find_project(&self, id: ProjectId) -> TeamRepositoryResult<Option<Project>> {
        let state = self.read()?;
        Ok(state.projects.get(&id).cloned())
    }

    async fn insert_member(&self, member: &Member) -> TeamRepositoryResult<()> {
        let mut state = self.write()?;
        state.check_member_unique(member)?;
        state.push_member(member);
        Ok(())
    }

    async fn update_member(&self, member: &Member) -> TeamRepositoryResult<()> {
        let mut state = self.write()?;
        if !state.members.contains_key(&member.id()) {
            return Err(TeamRepositoryError::MemberNotFound(member.id()));
        }
        if member.is_active() {
            state.check_member_unique(member)?;
        }
        state.members.insert(member.id(), member.clone());
        Ok(())
    }

    async fn find_member(&self, id: MemberId) -> TeamRepositoryResult<Option<Member>> {
        let state = self.read()?;
        Ok(state.members.get(&id).cloned())
    }

    async fn find_active_member(
        &self,
        project_id: ProjectId,
        user_id: &UserId,
    ) -> TeamRepositoryResult<Option<Member>> {
        let state = self.read()?;
        let member = state
            .ordered_members()
            .find(|member| {
                member.is_active()
                    && member.project_id() == project_id
                    && member.user_id() == user_id
            })
            .cloned();
        Ok(member)
    }

    async fn active_members(&self, project_id: ProjectId) -> TeamRepositoryResult<Vec<Member>> {
        let state = self.read()?;
        Ok(state
            .ordered_members()
            .filter(|member| member.is_active() && member.project_id() == project_id)
            .cloned()
            .collect())
    }

    async fn store_invitation(&self, invitation: &Invitation) -> TeamRepositoryResult<()> {
        let mut state = self.write()?;
        let project_id = invitation.project_id();
        let email = invitation.invited_email();

        if state.has_active_email(project_id, email) {
            return Err(TeamRepositoryError::AlreadyMember {
                project_id,
                email: email.clone(),
            });
        }
        let duplicate = state.ordered_invitations().any(|existing| {
            existing.project_id() == project_id
                && existing.invited_email() == email
                && existing.is_outstanding(invitation.created_at())
        });
        if duplicate {
            return Err(TeamRepositoryError::DuplicatePending {
                project_id,
                email: email.clone(),
            });
        }

        state.invitation_order.push(invitation.id());
        state.invitations.insert(invitation.id(), invitation.clone());
        Ok(())
    }

    async fn find_invitation(&self, id: InvitationId) -> TeamRepositoryResult<Option<Invitation>> {
        let state = self.read()?;
        Ok(state.invitations.get(&id).cloned())
    }

    async fn update_invitation(&self, invitation: &Invitation) -> TeamRepositoryResult<()> {
        let mut state = self.write()?;
        state.check_invitation_pending(invitation)?;
        state.invitations.insert(invitation.id(), invitation.clone());
        Ok(())
    }

    async fn accept_invitation(
        &self,
        invitation: &Invitation,
        member: &Member,
    ) -> TeamRepositoryResult<()> {
        let mut state = self.write()?;
        state.check_invitation_pending(invitation)?;
        state.check_member_unique(member)?;
        state.invitations.insert(invitation.id(), invitation.clone());
        state.push_member(member);
        Ok(())
    }

    async fn pending_invitations_for_email(
        &self,
        email: &EmailAddress,
        now: DateTime<Utc>,
    ) -> TeamRepositoryResult<Vec<Invitation>> {
        let state = self.read()?;
        Ok(state
            .ordered_invitations()
            .filter(|invitation| invitation.invited_email() == email && invitation.is_outstanding(now))
            .cloned()
            .collect())
    }
}
