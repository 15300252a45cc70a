//! In-memory integration tests for task edits and board queries.

use super::helpers::{Engine, engine, person};
use atelier::ErrorKind;
use atelier::task::{
    domain::{DeadlineStatus, Hours, TaskDetailsUpdate, TaskStatus},
    services::{CreateTaskRequest, TaskLifecycleError},
};
use atelier::team::domain::{Identity, Project, Role};
use chrono::TimeDelta;
use mockable::Clock;
use rstest::rstest;

async fn studio(engine: &Engine) -> Result<(Project, Identity, Identity), eyre::Report> {
    let owner = person("owner", "olive@studio.example", "Olive");
    let designer = person("designer", "dana@studio.example", "Dana")
        .with_photo_url("https://cdn.studio.example/dana.png");
    let project = engine.project(&owner, "Studio site").await;
    engine
        .membership
        .add_member(owner.user_id(), project.id(), &designer, Role::Member)
        .await?;
    Ok((project, owner, designer))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn progress_rounds_after_subtask_removal(engine: Engine) -> Result<(), eyre::Report> {
    let (project, _, designer) = studio(&engine).await?;
    let actor = designer.user_id();
    let task = engine
        .tasks
        .create(actor, CreateTaskRequest::new(project.id(), "Landing page"))
        .await?;
    let mut ids = Vec::new();
    for title in ["wireframe", "copy", "illustrations", "handoff"] {
        let (_, id) = engine.tasks.add_subtask(actor, task.id(), title).await?;
        ids.push(id);
    }
    let [wireframe, copy, _, handoff] = ids.as_slice() else {
        return Err(eyre::eyre!("expected four subtasks"));
    };

    let after_first = engine.tasks.toggle_subtask(actor, task.id(), *wireframe).await?;
    eyre::ensure!(after_first.progress() == 25, "one of four is 25%");
    let after_second = engine.tasks.toggle_subtask(actor, task.id(), *copy).await?;
    eyre::ensure!(after_second.progress() == 50, "two of four is 50%");
    let after_removal = engine.tasks.remove_subtask(actor, task.id(), *handoff).await?;
    eyre::ensure!(
        after_removal.progress() == 67,
        "two of three rounds to 67%, got {}",
        after_removal.progress()
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unassigning_clears_every_assignee_field(engine: Engine) -> Result<(), eyre::Report> {
    let (project, owner, designer) = studio(&engine).await?;
    let task = engine
        .tasks
        .create(owner.user_id(), CreateTaskRequest::new(project.id(), "Logo refresh"))
        .await?;

    let assigned = engine
        .tasks
        .assign(owner.user_id(), task.id(), Some(designer.user_id()))
        .await?;
    let assignee = assigned
        .assignment()
        .ok_or_else(|| eyre::eyre!("task should be assigned"))?
        .assignee();
    eyre::ensure!(assignee.name() == "Dana", "assignee name is copied");
    eyre::ensure!(
        assignee.photo_url() == Some("https://cdn.studio.example/dana.png"),
        "assignee photo is copied"
    );

    let cleared = engine.tasks.assign(owner.user_id(), task.id(), None).await?;
    eyre::ensure!(cleared.assignment().is_none(), "assignment is cleared at once");
    let mine = engine.tasks.list_assigned_to(designer.user_id()).await?;
    eyre::ensure!(mine.is_empty(), "designer has no tasks after unassignment");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removed_member_keeps_snapshot_but_loses_edit_rights(
    engine: Engine,
) -> Result<(), eyre::Report> {
    let (project, owner, designer) = studio(&engine).await?;
    let task = engine
        .tasks
        .create(owner.user_id(), CreateTaskRequest::new(project.id(), "Style guide"))
        .await?;
    engine
        .tasks
        .assign(owner.user_id(), task.id(), Some(designer.user_id()))
        .await?;
    let membership = engine
        .membership
        .list_active(project.id())
        .await?
        .into_iter()
        .find(|member| member.user_id() == designer.user_id())
        .ok_or_else(|| eyre::eyre!("designer should be active"))?;
    engine
        .membership
        .remove(owner.user_id(), project.id(), membership.id())
        .await?;

    let edit = engine
        .tasks
        .change_status(designer.user_id(), task.id(), TaskStatus::Completed)
        .await;
    eyre::ensure!(
        matches!(edit, Err(TaskLifecycleError::NotAMember { .. })),
        "removed member should not edit, got {edit:?}"
    );
    let stored = engine
        .tasks
        .find_by_id(task.id())
        .await?
        .ok_or_else(|| eyre::eyre!("task should exist"))?;
    eyre::ensure!(
        stored.is_assigned_to(designer.user_id()),
        "assignment snapshot survives removal"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deadline_status_is_computed_at_read_time(engine: Engine) -> Result<(), eyre::Report> {
    let (project, owner, _) = studio(&engine).await?;
    let deadline = engine.clock.utc() + TimeDelta::days(4) + TimeDelta::hours(2);
    let task = engine
        .tasks
        .create(
            owner.user_id(),
            CreateTaskRequest::new(project.id(), "Launch")
                .with_deadline(deadline)
                .with_estimated_hours(Hours::new(6.0)?),
        )
        .await?;

    let mut observed = Vec::new();
    for _ in 0..6 {
        observed.push(task.deadline_status(engine.clock.utc()));
        engine.clock.advance(TimeDelta::days(1));
    }

    eyre::ensure!(
        observed
            == vec![
                Some(DeadlineStatus::Normal(4)),
                Some(DeadlineStatus::DueSoon(3)),
                Some(DeadlineStatus::DueSoon(2)),
                Some(DeadlineStatus::DueSoon(1)),
                Some(DeadlineStatus::DueToday),
                Some(DeadlineStatus::Overdue),
            ],
        "unexpected deadline progression {observed:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn board_reflects_status_changes(engine: Engine) -> Result<(), eyre::Report> {
    let (project, owner, designer) = studio(&engine).await?;
    let mut created = Vec::new();
    for title in ["Hero image", "Pricing table", "Footer links"] {
        created.push(
            engine
                .tasks
                .create(designer.user_id(), CreateTaskRequest::new(project.id(), title))
                .await?,
        );
    }
    let [hero, pricing, footer] = created.as_slice() else {
        return Err(eyre::eyre!("expected three tasks"));
    };
    engine
        .tasks
        .change_status(designer.user_id(), hero.id(), TaskStatus::InProgress)
        .await?;
    engine
        .tasks
        .change_status(owner.user_id(), pricing.id(), TaskStatus::Completed)
        .await?;
    engine
        .tasks
        .update_details(
            owner.user_id(),
            footer.id(),
            TaskDetailsUpdate::new().description("Add the press kit link"),
        )
        .await?;

    let board = engine.tasks.board(project.id()).await?;
    let counts: Vec<usize> = board
        .columns()
        .iter()
        .map(|column| column.tasks().len())
        .collect();
    eyre::ensure!(counts == vec![1, 1, 0, 1], "unexpected column counts {counts:?}");

    let hits = engine.tasks.search(project.id(), "press KIT").await?;
    eyre::ensure!(hits.len() == 1, "description search should match once");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tasks_of_other_projects_are_isolated(engine: Engine) -> Result<(), eyre::Report> {
    let (project, owner, _) = studio(&engine).await?;
    let other = engine.project(&owner, "Studio app").await;
    engine
        .tasks
        .create(owner.user_id(), CreateTaskRequest::new(project.id(), "Site task"))
        .await?;
    let outsider_task = engine
        .tasks
        .create(owner.user_id(), CreateTaskRequest::new(other.id(), "App task"))
        .await?;

    let listed = engine.tasks.list_for_project(project.id()).await?;
    eyre::ensure!(listed.len() == 1, "only the site task is listed");

    let stranger = person("stranger", "sam@elsewhere.example", "Sam");
    let result = engine
        .tasks
        .delete(stranger.user_id(), outsider_task.id())
        .await;
    eyre::ensure!(
        result.as_ref().map_err(TaskLifecycleError::kind).err() == Some(ErrorKind::Forbidden),
        "strangers cannot delete tasks, got {result:?}"
    );
    Ok(())
}
