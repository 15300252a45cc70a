//! Then steps for collaboration BDD scenarios.

use super::world::{CollaborationWorld, run_async};
use atelier::task::domain::TaskStatus;
use atelier::team::domain::Role;
use rstest_bdd_macros::then;

#[then(r#""{name}" is an active "{role}" of the project"#)]
fn is_active_with_role(
    world: &mut CollaborationWorld,
    name: String,
    role: String,
) -> Result<(), eyre::Report> {
    let expected = Role::try_from(role.as_str())?;
    let member = world
        .active_member(&name)?
        .ok_or_else(|| eyre::eyre!("{name} is not an active member"))?;
    if member.role() != expected {
        return Err(eyre::eyre!(
            "expected {name} to be {expected}, found {}",
            member.role()
        ));
    }
    Ok(())
}

#[then(r#""{name}" is not a member of the project"#)]
fn is_not_member(world: &mut CollaborationWorld, name: String) -> Result<(), eyre::Report> {
    let identity = world.person(&name)?;
    let project_id = world.project()?.id();
    if run_async(world.membership.is_member(project_id, identity.user_id()))? {
        return Err(eyre::eyre!("{name} should no longer be a member"));
    }
    Ok(())
}

#[then("the project has {count:usize} active members")]
fn project_has_members(world: &CollaborationWorld, count: usize) -> Result<(), eyre::Report> {
    let project_id = world.project()?.id();
    let members = run_async(world.membership.list_active(project_id))?;
    if members.len() != count {
        return Err(eyre::eyre!(
            "expected {count} active members, found {}",
            members.len()
        ));
    }
    Ok(())
}

#[then(r#""{name}" has no pending invitations"#)]
fn has_no_pending_invitations(
    world: &mut CollaborationWorld,
    name: String,
) -> Result<(), eyre::Report> {
    let identity = world.person(&name)?;
    let pending = run_async(
        world
            .invitations
            .list_pending_for_email(identity.email().as_str()),
    )?;
    if !pending.is_empty() {
        return Err(eyre::eyre!("expected no pending invitations, found {pending:?}"));
    }
    Ok(())
}

#[then(r#"the last request fails with "{kind}""#)]
fn last_request_fails(world: &CollaborationWorld, kind: String) -> Result<(), eyre::Report> {
    let failure = world
        .last_failure
        .ok_or_else(|| eyre::eyre!("expected the last request to fail"))?;
    if failure.as_str() != kind {
        return Err(eyre::eyre!("expected {kind} failure, got {failure}"));
    }
    Ok(())
}

#[then("the task progress is {percent:u8} percent")]
fn task_progress_is(world: &CollaborationWorld, percent: u8) -> Result<(), eyre::Report> {
    let progress = world.task()?.progress();
    if progress != percent {
        return Err(eyre::eyre!("expected {percent}% progress, found {progress}%"));
    }
    Ok(())
}

#[then("the task has {count:usize} requirements")]
fn task_has_requirements(world: &CollaborationWorld, count: usize) -> Result<(), eyre::Report> {
    let summary = world.task()?.requirement_summary();
    if summary.total != count {
        return Err(eyre::eyre!("expected {count} requirements, found {summary}"));
    }
    Ok(())
}

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &CollaborationWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())?;
    let task_id = world.task()?.id();
    let stored = run_async(world.tasks.find_by_id(task_id))?
        .ok_or_else(|| eyre::eyre!("task should still exist"))?;
    if stored.status() != expected {
        return Err(eyre::eyre!(
            "expected status {expected}, found {}",
            stored.status()
        ));
    }
    Ok(())
}

#[then(r#"the task is assigned to "{name}""#)]
fn task_is_assigned_to(world: &mut CollaborationWorld, name: String) -> Result<(), eyre::Report> {
    let identity = world.person(&name)?;
    let assignment = world
        .task()?
        .assignment()
        .ok_or_else(|| eyre::eyre!("task should be assigned"))?;
    if assignment.assignee().user_id() != identity.user_id()
        || assignment.assignee().name() != identity.display_name()
    {
        return Err(eyre::eyre!(
            "expected assignee {name}, found {:?}",
            assignment.assignee()
        ));
    }
    Ok(())
}

#[then(r#""{name}" has {count:usize} assigned tasks"#)]
fn has_assigned_tasks(
    world: &mut CollaborationWorld,
    name: String,
    count: usize,
) -> Result<(), eyre::Report> {
    let identity = world.person(&name)?;
    let assigned = run_async(world.tasks.list_assigned_to(identity.user_id()))?;
    if assigned.len() != count {
        return Err(eyre::eyre!(
            "expected {count} assigned tasks, found {}",
            assigned.len()
        ));
    }
    Ok(())
}
