//! Project roles and the capability predicates derived from them.
//!
//! Roles are ordered `owner > admin > member > viewer`, but authorization is
//! decided by capability, not by comparing ranks.

use super::{ParseRoleError, TeamDomainError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role held by a project member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full control, including granting and revoking ownership.
    Owner,
    /// Manages members and invitations, except anything touching owners.
    Admin,
    /// Works on tasks.
    Member,
    /// Read-only access.
    Viewer,
}

impl Role {
    /// Every role, highest first.
    pub const ALL: [Self; 4] = [Self::Owner, Self::Admin, Self::Member, Self::Viewer];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Member => "member",
            Self::Viewer => "viewer",
        }
    }

    /// Returns whether this role may invite, add, and manage members.
    #[must_use]
    pub const fn can_manage_members(self) -> bool {
        matches!(self, Self::Owner | Self::Admin)
    }

    /// Returns whether this role may grant `target`, or modify a member
    /// currently holding `target`.
    ///
    /// Owners may touch any role. Admins may touch any role except `owner`.
    /// Members and viewers never change roles.
    #[must_use]
    pub const fn can_assign_role(self, target: Self) -> bool {
        match self {
            Self::Owner => true,
            Self::Admin => !matches!(target, Self::Owner),
            Self::Member | Self::Viewer => false,
        }
    }

    /// Returns whether this role may move a member from `current` to
    /// `requested`.
    #[must_use]
    pub const fn can_change_role(self, current: Self, requested: Self) -> bool {
        self.can_assign_role(current) && self.can_assign_role(requested)
    }

    /// Returns whether this role may remove a member holding `target`.
    ///
    /// Owners can never be removed.
    #[must_use]
    pub const fn can_remove_member(self, target: Self) -> bool {
        self.can_manage_members()
            && !matches!(target, Self::Owner)
            && self.can_assign_role(target)
    }

    /// Returns whether this role may create and modify tasks.
    #[must_use]
    pub const fn can_edit_tasks(self) -> bool {
        !matches!(self, Self::Viewer)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            "viewer" => Ok(Self::Viewer),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

/// Role that an invitation may grant. Ownership is never offered by
/// invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationRole {
    /// Grants [`Role::Admin`].
    Admin,
    /// Grants [`Role::Member`].
    Member,
    /// Grants [`Role::Viewer`].
    Viewer,
}

impl InvitationRole {
    /// Returns the member role granted on acceptance.
    #[must_use]
    pub const fn role(self) -> Role {
        match self {
            Self::Admin => Role::Admin,
            Self::Member => Role::Member,
            Self::Viewer => Role::Viewer,
        }
    }
}

impl From<InvitationRole> for Role {
    fn from(value: InvitationRole) -> Self {
        value.role()
    }
}

impl TryFrom<Role> for InvitationRole {
    type Error = TeamDomainError;

    fn try_from(value: Role) -> Result<Self, Self::Error> {
        match value {
            Role::Owner => Err(TeamDomainError::OwnerInvitation),
            Role::Admin => Ok(Self::Admin),
            Role::Member => Ok(Self::Member),
            Role::Viewer => Ok(Self::Viewer),
        }
    }
}

impl fmt::Display for InvitationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.role().as_str())
    }
}
