//! Given steps for collaboration BDD scenarios.

use super::world::{CollaborationWorld, run_async};
use atelier::task::services::CreateTaskRequest;
use atelier::team::domain::Role;
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#""{owner}" owns a project named "{name}""#)]
fn owns_project(
    world: &mut CollaborationWorld,
    owner: String,
    name: String,
) -> Result<(), eyre::Report> {
    let identity = world.person(&owner)?;
    let project = run_async(world.membership.create_project(&identity, &name))
        .wrap_err("create project for scenario")?;
    world.project = Some(project);
    Ok(())
}

#[given(r#""{name}" is a "{role}" of the project"#)]
fn is_member_with_role(
    world: &mut CollaborationWorld,
    name: String,
    role: String,
) -> Result<(), eyre::Report> {
    let parsed = Role::try_from(role.as_str())?;
    let identity = world.person(&name)?;
    let project = world.project()?.clone();
    run_async(
        world
            .membership
            .add_member(project.owner(), project.id(), &identity, parsed),
    )
    .wrap_err("add member for scenario")?;
    Ok(())
}

#[given(r#""{author}" has created a task titled "{title}""#)]
fn has_created_task(
    world: &mut CollaborationWorld,
    author: String,
    title: String,
) -> Result<(), eyre::Report> {
    let identity = world.person(&author)?;
    let project_id = world.project()?.id();
    let task = run_async(
        world
            .tasks
            .create(identity.user_id(), CreateTaskRequest::new(project_id, title)),
    )
    .wrap_err("create task for scenario")?;
    world.task = Some(task);
    Ok(())
}

#[given(r#"the task has the subtasks "{titles}""#)]
fn task_has_subtasks(world: &mut CollaborationWorld, titles: String) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let author = world.task()?.created_by().clone();
    for title in titles.split(',').map(str::trim) {
        let (task, subtask_id) = run_async(world.tasks.add_subtask(&author, task_id, title))
            .wrap_err("add subtask for scenario")?;
        world.task = Some(task);
        world.subtasks.push(subtask_id);
    }
    Ok(())
}
