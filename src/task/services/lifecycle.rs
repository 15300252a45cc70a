//! Service layer for task creation, edits, and board queries.

use crate::config::TaskLimits;
use crate::error::ErrorKind;
use crate::sync::{KeyedLocks, SnapshotCallback, Subscription, SyncHub};
use crate::task::{
    domain::{
        AssigneeSnapshot, Assignment, Hours, KanbanBoard, Requirement, RequirementId, Subtask,
        SubtaskId, Task, TaskDetailsUpdate, TaskDomainError, TaskDraft, TaskId, TaskPriority,
        TaskStatus,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use crate::team::{
    domain::{Member, ProjectId, Role, UserId},
    ports::{TeamRepository, TeamRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTaskRequest {
    project_id: ProjectId,
    title: String,
    description: Option<String>,
    status: Option<TaskStatus>,
    priority: Option<TaskPriority>,
    deadline: Option<DateTime<Utc>>,
    estimated_hours: Option<Hours>,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(project_id: ProjectId, title: impl Into<String>) -> Self {
        Self {
            project_id,
            title: title.into(),
            description: None,
            status: None,
            priority: None,
            deadline: None,
            estimated_hours: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the initial status instead of `todo`.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the priority instead of `medium`.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets the effort estimate.
    #[must_use]
    pub const fn with_estimated_hours(mut self, hours: Hours) -> Self {
        self.estimated_hours = Some(hours);
        self
    }

    fn into_draft(self, created_by: UserId) -> TaskDraft {
        let mut draft = TaskDraft::new(self.project_id, self.title, created_by);
        if let Some(description) = self.description {
            draft = draft.with_description(description);
        }
        if let Some(status) = self.status {
            draft = draft.with_status(status);
        }
        if let Some(priority) = self.priority {
            draft = draft.with_priority(priority);
        }
        if let Some(deadline) = self.deadline {
            draft = draft.with_deadline(deadline);
        }
        if let Some(hours) = self.estimated_hours {
            draft = draft.with_estimated_hours(hours);
        }
        draft
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// Task repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),

    /// Membership lookup failed.
    #[error(transparent)]
    Membership(#[from] TeamRepositoryError),

    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The acting user has no active membership in the task's project.
    #[error("user {user_id} is not an active member of project {project_id}")]
    NotAMember {
        /// Target project.
        project_id: ProjectId,
        /// Acting user.
        user_id: UserId,
    },

    /// The acting user's role may not edit tasks.
    #[error("{role} {user_id} may not edit tasks")]
    Forbidden {
        /// Acting user.
        user_id: UserId,
        /// Acting user's role.
        role: Role,
    },

    /// The requested assignee is not an active member of the project.
    #[error("assignee {user_id} is not an active member of project {project_id}")]
    AssigneeNotMember {
        /// Task project.
        project_id: ProjectId,
        /// Requested assignee.
        user_id: UserId,
    },
}

impl TaskLifecycleError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(
                TaskDomainError::SubtaskNotFound(_) | TaskDomainError::RequirementNotFound(_),
            )
            | Self::Repository(TaskRepositoryError::NotFound(_))
            | Self::TaskNotFound(_)
            | Self::AssigneeNotMember { .. } => ErrorKind::NotFound,
            Self::Domain(_) => ErrorKind::Validation,
            Self::Repository(TaskRepositoryError::DuplicateTask(_)) => ErrorKind::AlreadyExists,
            Self::Repository(TaskRepositoryError::Persistence(_)) | Self::Membership(_) => {
                ErrorKind::Persistence
            }
            Self::NotAMember { .. } | Self::Forbidden { .. } => ErrorKind::Forbidden,
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// Every mutation on a task runs its read-modify-write under that task's
/// lock; mutations on different tasks proceed concurrently. Subscribers of
/// the task's project receive the new task list before the call returns.
#[derive(Clone)]
pub struct TaskLifecycleService<R, M, C>
where
    R: TaskRepository,
    M: TeamRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    team: Arc<M>,
    clock: Arc<C>,
    hub: SyncHub,
    limits: TaskLimits,
    locks: Arc<KeyedLocks<TaskId>>,
}

impl<R, M, C> TaskLifecycleService<R, M, C>
where
    R: TaskRepository,
    M: TeamRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service with default limits.
    #[must_use]
    pub fn new(repository: Arc<R>, team: Arc<M>, clock: Arc<C>, hub: SyncHub) -> Self {
        Self {
            repository,
            team,
            clock,
            hub,
            limits: TaskLimits::default(),
            locks: Arc::new(KeyedLocks::new()),
        }
    }

    /// Replaces the validation limits.
    #[must_use]
    pub const fn with_limits(mut self, limits: TaskLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Creates a task in a project.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotAMember`] or
    /// [`TaskLifecycleError::Forbidden`] when `actor` may not edit tasks in
    /// the project, and [`TaskLifecycleError::Domain`] when the title or
    /// description fails validation.
    pub async fn create(
        &self,
        actor: &UserId,
        request: CreateTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let project_id = request.project_id;
        self.require_editor(project_id, actor).await?;

        let task = Task::create(request.into_draft(actor.clone()), &self.limits, &*self.clock)?;
        self.repository.store(&task).await?;
        info!(task_id = %task.id(), project_id = %project_id, created_by = %actor, "task created");

        self.publish(project_id).await?;
        Ok(task)
    }

    /// Moves a task to `status`. Any status may follow any other.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] when the task does not
    /// exist, or an authorization error when `actor` may not edit tasks.
    pub async fn change_status(
        &self,
        actor: &UserId,
        task_id: TaskId,
        status: TaskStatus,
    ) -> TaskLifecycleResult<Task> {
        let clock = &*self.clock;
        let (task, ()) = self
            .edit(actor, task_id, "status changed", |task| {
                task.set_status(status, clock);
                Ok(())
            })
            .await?;
        Ok(task)
    }

    /// Assigns the task to the active member `assignee`, or clears the
    /// assignment when `assignee` is `None`.
    ///
    /// The assignee's name, email, and photo are copied from their
    /// membership at this moment.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::AssigneeNotMember`] when `assignee` is
    /// not an active member of the task's project, alongside the errors of
    /// [`Self::change_status`].
    pub async fn assign(
        &self,
        actor: &UserId,
        task_id: TaskId,
        assignee: Option<&UserId>,
    ) -> TaskLifecycleResult<Task> {
        let _guard = self.locks.lock(task_id).await;
        let mut task = self.load(task_id).await?;
        let project_id = task.project_id();
        self.require_editor(project_id, actor).await?;

        match assignee {
            Some(user_id) => {
                let member = self
                    .team
                    .find_active_member(project_id, user_id)
                    .await?
                    .ok_or_else(|| TaskLifecycleError::AssigneeNotMember {
                        project_id,
                        user_id: user_id.clone(),
                    })?;
                let assignment = Assignment::new(
                    AssigneeSnapshot::of(&member),
                    actor.clone(),
                    self.clock.utc(),
                );
                task.assign(assignment, &*self.clock);
            }
            None => {
                task.unassign(&*self.clock);
            }
        }

        self.commit(actor, &task, "assignment changed").await?;
        Ok(task)
    }

    /// Applies a partial update of the task's descriptive fields.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when a new title or
    /// description fails validation, alongside the errors of
    /// [`Self::change_status`].
    pub async fn update_details(
        &self,
        actor: &UserId,
        task_id: TaskId,
        update: TaskDetailsUpdate,
    ) -> TaskLifecycleResult<Task> {
        let clock = &*self.clock;
        let limits = &self.limits;
        let (task, ()) = self
            .edit(actor, task_id, "details updated", |task| {
                task.apply_details(update, limits, clock)
            })
            .await?;
        Ok(task)
    }

    /// Deletes a task, returning its final state.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] when the task does not
    /// exist, or an authorization error when `actor` may not edit tasks.
    pub async fn delete(&self, actor: &UserId, task_id: TaskId) -> TaskLifecycleResult<Task> {
        let _guard = self.locks.lock(task_id).await;
        let task = self.load(task_id).await?;
        self.require_editor(task.project_id(), actor).await?;

        self.repository.delete(task_id).await?;
        info!(task_id = %task_id, project_id = %task.project_id(), deleted_by = %actor, "task deleted");

        self.publish(task.project_id()).await?;
        Ok(task)
    }

    /// Appends a subtask and recomputes progress.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the title is blank or the
    /// checklist is full, alongside the errors of [`Self::change_status`].
    pub async fn add_subtask(
        &self,
        actor: &UserId,
        task_id: TaskId,
        title: &str,
    ) -> TaskLifecycleResult<(Task, SubtaskId)> {
        let subtask = Subtask::new(title)?;
        let clock = &*self.clock;
        let limits = &self.limits;
        self.edit(actor, task_id, "subtask added", |task| {
            task.add_subtask(subtask, limits, clock)
        })
        .await
    }

    /// Flips a subtask's completion and recomputes progress.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the subtask does not
    /// belong to the task, alongside the errors of [`Self::change_status`].
    pub async fn toggle_subtask(
        &self,
        actor: &UserId,
        task_id: TaskId,
        subtask_id: SubtaskId,
    ) -> TaskLifecycleResult<Task> {
        let clock = &*self.clock;
        let (task, _) = self
            .edit(actor, task_id, "subtask toggled", |task| {
                task.toggle_subtask(subtask_id, clock)
            })
            .await?;
        Ok(task)
    }

    /// Removes a subtask and recomputes progress.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the subtask does not
    /// belong to the task, alongside the errors of [`Self::change_status`].
    pub async fn remove_subtask(
        &self,
        actor: &UserId,
        task_id: TaskId,
        subtask_id: SubtaskId,
    ) -> TaskLifecycleResult<Task> {
        let clock = &*self.clock;
        let (task, _) = self
            .edit(actor, task_id, "subtask removed", |task| {
                task.remove_subtask(subtask_id, clock)
            })
            .await?;
        Ok(task)
    }

    /// Appends a requirement. Progress is unaffected.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the text is blank or the
    /// checklist is full, alongside the errors of [`Self::change_status`].
    pub async fn add_requirement(
        &self,
        actor: &UserId,
        task_id: TaskId,
        text: &str,
    ) -> TaskLifecycleResult<(Task, RequirementId)> {
        let requirement = Requirement::new(text)?;
        let clock = &*self.clock;
        let limits = &self.limits;
        self.edit(actor, task_id, "requirement added", |task| {
            task.add_requirement(requirement, limits, clock)
        })
        .await
    }

    /// Flips whether a requirement is met.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the requirement does not
    /// belong to the task, alongside the errors of [`Self::change_status`].
    pub async fn toggle_requirement(
        &self,
        actor: &UserId,
        task_id: TaskId,
        requirement_id: RequirementId,
    ) -> TaskLifecycleResult<Task> {
        let clock = &*self.clock;
        let (task, _) = self
            .edit(actor, task_id, "requirement toggled", |task| {
                task.toggle_requirement(requirement_id, clock)
            })
            .await?;
        Ok(task)
    }

    /// Removes a requirement.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the requirement does not
    /// belong to the task, alongside the errors of [`Self::change_status`].
    pub async fn remove_requirement(
        &self,
        actor: &UserId,
        task_id: TaskId,
        requirement_id: RequirementId,
    ) -> TaskLifecycleResult<Task> {
        let clock = &*self.clock;
        let (task, _) = self
            .edit(actor, task_id, "requirement removed", |task| {
                task.remove_requirement(requirement_id, clock)
            })
            .await?;
        Ok(task)
    }

    /// Retrieves a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn find_by_id(&self, task_id: TaskId) -> TaskLifecycleResult<Option<Task>> {
        Ok(self.repository.find_by_id(task_id).await?)
    }

    /// Returns every task of a project in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn list_for_project(&self, project_id: ProjectId) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.repository.find_by_project(project_id).await?)
    }

    /// Returns every task assigned to `user_id`, across projects.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn list_assigned_to(&self, user_id: &UserId) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.repository.find_by_assignee(user_id).await?)
    }

    /// Returns the project's tasks that have no assignee.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn list_unassigned(&self, project_id: ProjectId) -> TaskLifecycleResult<Vec<Task>> {
        let tasks = self.repository.find_by_project(project_id).await?;
        Ok(tasks
            .into_iter()
            .filter(|task| task.assignment().is_none())
            .collect())
    }

    /// Returns the project's tasks whose title or description contains
    /// `query`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn search(
        &self,
        project_id: ProjectId,
        query: &str,
    ) -> TaskLifecycleResult<Vec<Task>> {
        let tasks = self.repository.find_by_project(project_id).await?;
        Ok(tasks
            .into_iter()
            .filter(|task| task.matches_query(query))
            .collect())
    }

    /// Groups the project's tasks into kanban columns.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn board(&self, project_id: ProjectId) -> TaskLifecycleResult<KanbanBoard> {
        let tasks = self.repository.find_by_project(project_id).await?;
        Ok(KanbanBoard::from_tasks(tasks))
    }

    /// Subscribes to the task list of a project.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the initial snapshot
    /// cannot be loaded.
    pub async fn subscribe_tasks(
        &self,
        project_id: ProjectId,
        callback: SnapshotCallback<Task>,
    ) -> TaskLifecycleResult<Subscription> {
        let repository = &*self.repository;
        let subscription = self
            .hub
            .tasks()
            .subscribe(project_id, callback, || repository.find_by_project(project_id))
            .await?;
        Ok(subscription)
    }

    async fn edit<T>(
        &self,
        actor: &UserId,
        task_id: TaskId,
        action: &'static str,
        apply: impl FnOnce(&mut Task) -> Result<T, TaskDomainError> + Send,
    ) -> TaskLifecycleResult<(Task, T)> {
        let _guard = self.locks.lock(task_id).await;
        let mut task = self.load(task_id).await?;
        self.require_editor(task.project_id(), actor).await?;

        let outcome = apply(&mut task)?;
        self.commit(actor, &task, action).await?;
        Ok((task, outcome))
    }

    async fn commit(&self, actor: &UserId, task: &Task, action: &'static str) -> TaskLifecycleResult<()> {
        self.repository.update(task).await?;
        info!(
            task_id = %task.id(),
            project_id = %task.project_id(),
            actor = %actor,
            progress = task.progress(),
            "task {action}"
        );
        self.publish(task.project_id()).await
    }

    async fn load(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::TaskNotFound(task_id))
    }

    async fn require_editor(
        &self,
        project_id: ProjectId,
        actor: &UserId,
    ) -> TaskLifecycleResult<Member> {
        let member = self
            .team
            .find_active_member(project_id, actor)
            .await?
            .ok_or_else(|| TaskLifecycleError::NotAMember {
                project_id,
                user_id: actor.clone(),
            })?;
        if !member.role().can_edit_tasks() {
            warn!(project_id = %project_id, user_id = %actor, role = %member.role(), "task edit forbidden");
            return Err(TaskLifecycleError::Forbidden {
                user_id: actor.clone(),
                role: member.role(),
            });
        }
        Ok(member)
    }

    async fn publish(&self, project_id: ProjectId) -> TaskLifecycleResult<()> {
        let repository = &*self.repository;
        self.hub
            .tasks()
            .publish(&project_id, || repository.find_by_project(project_id))
            .await?;
        Ok(())
    }
}
