//! Domain model for project teams.
//!
//! Roles, memberships, invitations, and projects, with the capability rules
//! that decide who may change what. Infrastructure stays outside this
//! boundary.

mod email;
mod error;
mod identity;
mod ids;
mod invitation;
mod member;
mod project;
mod role;

pub use email::EmailAddress;
pub use error::{
    InvitationNotPending, ParseInvitationStatusError, ParseMemberStatusError, ParseRoleError,
    TeamDomainError,
};
pub use identity::Identity;
pub use ids::{InvitationId, MemberId, ProjectId, UserId};
pub use invitation::{INVITATION_TTL_DAYS, Invitation, InvitationStatus};
pub use member::{Member, MemberStatus};
pub use project::{Project, ProjectName};
pub use role::{InvitationRole, Role};
