//! When steps for collaboration BDD scenarios.

use super::world::{CollaborationWorld, run_async};
use atelier::task::{domain::TaskStatus, services::TaskLifecycleError};
use atelier::team::{
    domain::{InvitationRole, Role},
    services::TeamServiceError,
};
use rstest_bdd_macros::when;

#[when(r#""{inviter}" invites "{invitee}" as "{role}""#)]
fn invites(
    world: &mut CollaborationWorld,
    inviter: String,
    invitee: String,
    role: String,
) -> Result<(), eyre::Report> {
    let invited_role = InvitationRole::try_from(Role::try_from(role.as_str())?)?;
    let sender = world.person(&inviter)?;
    let recipient = world.person(&invitee)?;
    let project_id = world.project()?.id();
    let result = run_async(world.invitations.invite(
        &sender,
        project_id,
        recipient.email().as_str(),
        invited_role,
    ));
    if let Some(invitation) = world.record(result, TeamServiceError::kind) {
        world.invitation = Some(invitation);
    }
    Ok(())
}

#[when(r#""{name}" accepts the invitation"#)]
fn accepts(world: &mut CollaborationWorld, name: String) -> Result<(), eyre::Report> {
    let identity = world.person(&name)?;
    let invitation_id = world
        .invitation
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing invitation in scenario world"))?
        .id();
    let result = run_async(world.invitations.accept(invitation_id, &identity));
    world.record(result, TeamServiceError::kind);
    Ok(())
}

#[when(r#""{name}" declines the invitation"#)]
fn declines(world: &mut CollaborationWorld, name: String) -> Result<(), eyre::Report> {
    let identity = world.person(&name)?;
    let invitation_id = world
        .invitation
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing invitation in scenario world"))?
        .id();
    let result = run_async(world.invitations.decline(invitation_id, &identity));
    if let Some(invitation) = world.record(result, TeamServiceError::kind) {
        world.invitation = Some(invitation);
    }
    Ok(())
}

#[when(r#""{actor}" changes the role of "{target}" to "{role}""#)]
fn changes_role(
    world: &mut CollaborationWorld,
    actor: String,
    target: String,
    role: String,
) -> Result<(), eyre::Report> {
    let requested = Role::try_from(role.as_str())?;
    let acting = world.person(&actor)?;
    let member = world
        .active_member(&target)?
        .ok_or_else(|| eyre::eyre!("{target} is not an active member"))?;
    let project_id = world.project()?.id();
    let result = run_async(world.membership.update_role(
        acting.user_id(),
        project_id,
        member.id(),
        requested,
    ));
    world.record(result, TeamServiceError::kind);
    Ok(())
}

#[when(r#""{actor}" removes "{target}" from the project"#)]
fn removes(
    world: &mut CollaborationWorld,
    actor: String,
    target: String,
) -> Result<(), eyre::Report> {
    let acting = world.person(&actor)?;
    let member = world
        .active_member(&target)?
        .ok_or_else(|| eyre::eyre!("{target} is not an active member"))?;
    let project_id = world.project()?.id();
    let result = run_async(
        world
            .membership
            .remove(acting.user_id(), project_id, member.id()),
    );
    world.record(result, TeamServiceError::kind);
    Ok(())
}

#[when(r#""{actor}" completes subtask {position:usize}"#)]
fn completes_subtask(
    world: &mut CollaborationWorld,
    actor: String,
    position: usize,
) -> Result<(), eyre::Report> {
    let acting = world.person(&actor)?;
    let task_id = world.task()?.id();
    let subtask_id = position
        .checked_sub(1)
        .and_then(|index| world.subtasks.get(index))
        .copied()
        .ok_or_else(|| eyre::eyre!("no subtask at position {position}"))?;
    let result = run_async(
        world
            .tasks
            .toggle_subtask(acting.user_id(), task_id, subtask_id),
    );
    if let Some(task) = world.record(result, TaskLifecycleError::kind) {
        world.task = Some(task);
    }
    Ok(())
}

#[when(r#""{actor}" adds the requirement "{text}""#)]
fn adds_requirement(
    world: &mut CollaborationWorld,
    actor: String,
    text: String,
) -> Result<(), eyre::Report> {
    let acting = world.person(&actor)?;
    let task_id = world.task()?.id();
    let result = run_async(world.tasks.add_requirement(acting.user_id(), task_id, &text));
    if let Some((task, _)) = world.record(result, TaskLifecycleError::kind) {
        world.task = Some(task);
    }
    Ok(())
}

#[when(r#""{actor}" moves the task to "{status}""#)]
fn moves_task(
    world: &mut CollaborationWorld,
    actor: String,
    status: String,
) -> Result<(), eyre::Report> {
    let target = TaskStatus::try_from(status.as_str())?;
    let acting = world.person(&actor)?;
    let task_id = world.task()?.id();
    let result = run_async(world.tasks.change_status(acting.user_id(), task_id, target));
    if let Some(task) = world.record(result, TaskLifecycleError::kind) {
        world.task = Some(task);
    }
    Ok(())
}

#[when(r#""{actor}" assigns the task to "{assignee}""#)]
fn assigns_task(
    world: &mut CollaborationWorld,
    actor: String,
    assignee: String,
) -> Result<(), eyre::Report> {
    let acting = world.person(&actor)?;
    let target = world.person(&assignee)?;
    let task_id = world.task()?.id();
    let result = run_async(
        world
            .tasks
            .assign(acting.user_id(), task_id, Some(target.user_id())),
    );
    if let Some(task) = world.record(result, TaskLifecycleError::kind) {
        world.task = Some(task);
    }
    Ok(())
}
