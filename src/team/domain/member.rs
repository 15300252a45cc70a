//! Project membership records.

use super::{EmailAddress, Identity, MemberId, ParseMemberStatusError, ProjectId, Role, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Membership status. Removal is a status change, never a physical delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    /// The member participates in the project.
    Active,
    /// The member was removed; the row is kept for audit history.
    Removed,
}

impl MemberStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Removed => "removed",
        }
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for MemberStatus {
    type Error = ParseMemberStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "active" => Ok(Self::Active),
            "removed" => Ok(Self::Removed),
            _ => Err(ParseMemberStatusError(value.to_owned())),
        }
    }
}

/// A user's participation record in a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    id: MemberId,
    project_id: ProjectId,
    user_id: UserId,
    email: EmailAddress,
    display_name: String,
    photo_url: Option<String>,
    role: Role,
    status: MemberStatus,
    joined_at: DateTime<Utc>,
    invited_by: UserId,
}

impl Member {
    /// Creates an active membership for `identity`.
    #[must_use]
    pub fn join(
        project_id: ProjectId,
        identity: &Identity,
        role: Role,
        invited_by: UserId,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: MemberId::new(),
            project_id,
            user_id: identity.user_id().clone(),
            email: identity.email().clone(),
            display_name: identity.display_name().to_owned(),
            photo_url: identity.photo_url().map(str::to_owned),
            role,
            status: MemberStatus::Active,
            joined_at: clock.utc(),
            invited_by,
        }
    }

    /// Returns the membership identifier.
    #[must_use]
    pub const fn id(&self) -> MemberId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the member's user identifier.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns the member's email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the display name captured when the member joined.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the profile photo URL captured when the member joined.
    #[must_use]
    pub fn photo_url(&self) -> Option<&str> {
        self.photo_url.as_deref()
    }

    /// Returns the member's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the membership status.
    #[must_use]
    pub const fn status(&self) -> MemberStatus {
        self.status
    }

    /// Returns whether the membership is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.status, MemberStatus::Active)
    }

    /// Returns when the member joined.
    #[must_use]
    pub const fn joined_at(&self) -> DateTime<Utc> {
        self.joined_at
    }

    /// Returns the user who invited or added this member.
    #[must_use]
    pub const fn invited_by(&self) -> &UserId {
        &self.invited_by
    }

    /// Sets the member's role.
    pub const fn set_role(&mut self, role: Role) {
        self.role = role;
    }

    /// Marks the membership as removed.
    pub const fn mark_removed(&mut self) {
        self.status = MemberStatus::Removed;
    }
}
