//! Snapshot publication after committed team writes.

use super::TeamServiceResult;
use crate::sync::SyncHub;
use crate::team::{
    domain::{EmailAddress, ProjectId},
    ports::TeamRepository,
};
use mockable::Clock;

pub(super) async fn publish_members<R>(
    hub: &SyncHub,
    repository: &R,
    project_id: ProjectId,
) -> TeamServiceResult<()>
where
    R: TeamRepository,
{
    hub.members()
        .publish(&project_id, || repository.active_members(project_id))
        .await?;
    Ok(())
}

pub(super) async fn publish_invitations<R, C>(
    hub: &SyncHub,
    repository: &R,
    clock: &C,
    email: &EmailAddress,
) -> TeamServiceResult<()>
where
    R: TeamRepository,
    C: Clock + Send + Sync,
{
    hub.invitations()
        .publish(email, || {
            repository.pending_invitations_for_email(email, clock.utc())
        })
        .await?;
    Ok(())
}
