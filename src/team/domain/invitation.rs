//! Membership invitations.
//!
//! Expiry is a predicate over the stored `expires_at` timestamp, never a
//! stored status: a pending invitation past its expiry stays `pending` in
//! storage but is excluded from every read and rejected on acceptance.

use super::{
    EmailAddress, Identity, InvitationId, InvitationNotPending, InvitationRole,
    ParseInvitationStatusError, Project, ProjectId, ProjectName, UserId,
};
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of days an invitation stays valid after creation.
pub const INVITATION_TTL_DAYS: i64 = 7;

/// Stored invitation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    /// Awaiting a response.
    Pending,
    /// Accepted; a member row was created.
    Accepted,
    /// Declined by the invitee.
    Declined,
}

impl InvitationStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        }
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for InvitationStatus {
    type Error = ParseInvitationStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "declined" => Ok(Self::Declined),
            _ => Err(ParseInvitationStatusError(value.to_owned())),
        }
    }
}

/// Offer of membership sent to an email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
    id: InvitationId,
    project_id: ProjectId,
    project_name: ProjectName,
    invited_email: EmailAddress,
    role: InvitationRole,
    status: InvitationStatus,
    invited_by: UserId,
    invited_by_name: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl Invitation {
    /// Issues a pending invitation to `email` on behalf of `inviter`.
    ///
    /// The project name and inviter name are snapshotted for display.
    #[must_use]
    pub fn issue(
        project: &Project,
        email: EmailAddress,
        role: InvitationRole,
        inviter: &Identity,
        clock: &impl Clock,
    ) -> Self {
        let created_at = clock.utc();
        Self {
            id: InvitationId::new(),
            project_id: project.id(),
            project_name: project.name().clone(),
            invited_email: email,
            role,
            status: InvitationStatus::Pending,
            invited_by: inviter.user_id().clone(),
            invited_by_name: inviter.display_name().to_owned(),
            created_at,
            expires_at: created_at + TimeDelta::days(INVITATION_TTL_DAYS),
        }
    }

    /// Returns the invitation identifier.
    #[must_use]
    pub const fn id(&self) -> InvitationId {
        self.id
    }

    /// Returns the target project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the project name at the time the invitation was issued.
    #[must_use]
    pub const fn project_name(&self) -> &ProjectName {
        &self.project_name
    }

    /// Returns the invited email address.
    #[must_use]
    pub const fn invited_email(&self) -> &EmailAddress {
        &self.invited_email
    }

    /// Returns the role granted on acceptance.
    #[must_use]
    pub const fn role(&self) -> InvitationRole {
        self.role
    }

    /// Returns the stored status.
    #[must_use]
    pub const fn status(&self) -> InvitationStatus {
        self.status
    }

    /// Returns the inviting user.
    #[must_use]
    pub const fn invited_by(&self) -> &UserId {
        &self.invited_by
    }

    /// Returns the inviter's display name at the time of issue.
    #[must_use]
    pub fn invited_by_name(&self) -> &str {
        &self.invited_by_name
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the expiry timestamp.
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns whether the invitation has expired at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Returns whether the invitation is pending and unexpired at `now`.
    #[must_use]
    pub fn is_outstanding(&self, now: DateTime<Utc>) -> bool {
        self.status == InvitationStatus::Pending && !self.is_expired(now)
    }

    /// Marks the invitation accepted.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationNotPending`] when the invitation was already
    /// answered.
    pub fn mark_accepted(&mut self) -> Result<(), InvitationNotPending> {
        self.transition(InvitationStatus::Accepted)
    }

    /// Marks the invitation declined.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationNotPending`] when the invitation was already
    /// answered.
    pub fn mark_declined(&mut self) -> Result<(), InvitationNotPending> {
        self.transition(InvitationStatus::Declined)
    }

    fn transition(&mut self, next: InvitationStatus) -> Result<(), InvitationNotPending> {
        if self.status != InvitationStatus::Pending {
            return Err(InvitationNotPending(self.status));
        }
        self.status = next;
        Ok(())
    }
}
