//! Application services for project membership and invitations.

mod error;
mod invitation;
mod membership;
mod notify;

pub use error::{TeamAction, TeamServiceError, TeamServiceResult};
pub use invitation::InvitationService;
pub use membership::MembershipService;
