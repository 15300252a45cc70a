//! Hub holding one topic per collection kind.

use super::{CollectionKind, Topic};
use crate::task::domain::Task;
use crate::team::domain::{EmailAddress, Invitation, Member, ProjectId};

/// Shared registry of snapshot subscribers.
///
/// Services publish to the hub after every committed mutation. Cloning the
/// hub shares the same registrations.
#[derive(Debug, Clone)]
pub struct SyncHub {
    members: Topic<ProjectId, Member>,
    tasks: Topic<ProjectId, Task>,
    invitations: Topic<EmailAddress, Invitation>,
}

impl SyncHub {
    /// Creates a hub with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            members: Topic::new(CollectionKind::Members),
            tasks: Topic::new(CollectionKind::Tasks),
            invitations: Topic::new(CollectionKind::InvitationsForEmail),
        }
    }

    /// Active members, keyed by project.
    #[must_use]
    pub const fn members(&self) -> &Topic<ProjectId, Member> {
        &self.members
    }

    /// Tasks, keyed by project.
    #[must_use]
    pub const fn tasks(&self) -> &Topic<ProjectId, Task> {
        &self.tasks
    }

    /// Outstanding invitations, keyed by invited email.
    #[must_use]
    pub const fn invitations(&self) -> &Topic<EmailAddress, Invitation> {
        &self.invitations
    }
}

impl Default for SyncHub {
    fn default() -> Self {
        Self::new()
    }
}
