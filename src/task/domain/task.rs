//! Task aggregate root.

use super::{
    Assignment, ChecklistSummary, DeadlineStatus, Hours, Requirement, RequirementId, Subtask,
    SubtaskId, TaskDomainError, TaskId, TaskPriority, TaskStatus,
};
use crate::config::TaskLimits;
use crate::team::domain::{ProjectId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Validated input for creating a task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    project_id: ProjectId,
    title: String,
    description: String,
    status: TaskStatus,
    priority: TaskPriority,
    deadline: Option<DateTime<Utc>>,
    estimated_hours: Option<Hours>,
    created_by: UserId,
}

impl TaskDraft {
    /// Creates a draft with the required fields; status defaults to `todo`
    /// and priority to `medium`.
    #[must_use]
    pub fn new(project_id: ProjectId, title: impl Into<String>, created_by: UserId) -> Self {
        Self {
            project_id,
            title: title.into(),
            description: String::new(),
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            deadline: None,
            estimated_hours: None,
            created_by,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the initial status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
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

    /// Returns the target project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn created_by(&self) -> &UserId {
        &self.created_by
    }
}

/// Partial update of a task's descriptive fields.
///
/// `None` leaves a field untouched. For optional fields, `Some(None)`
/// clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDetailsUpdate {
    title: Option<String>,
    description: Option<String>,
    priority: Option<TaskPriority>,
    deadline: Option<Option<DateTime<Utc>>>,
    estimated_hours: Option<Option<Hours>>,
    actual_hours: Option<Option<Hours>>,
}

impl TaskDetailsUpdate {
    /// Creates an update that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the priority.
    #[must_use]
    pub const fn priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets or clears the deadline.
    #[must_use]
    pub const fn deadline(mut self, deadline: Option<DateTime<Utc>>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets or clears the effort estimate.
    #[must_use]
    pub const fn estimated_hours(mut self, hours: Option<Hours>) -> Self {
        self.estimated_hours = Some(hours);
        self
    }

    /// Sets or clears the recorded effort.
    #[must_use]
    pub const fn actual_hours(mut self, hours: Option<Hours>) -> Self {
        self.actual_hours = Some(hours);
        self
    }

    /// Returns whether the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.deadline.is_none()
            && self.estimated_hours.is_none()
            && self.actual_hours.is_none()
    }
}

/// Task aggregate root.
///
/// `progress` is derived from the subtask list and recomputed inside every
/// subtask mutation; there is no way to set it directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    project_id: ProjectId,
    title: String,
    description: String,
    status: TaskStatus,
    priority: TaskPriority,
    deadline: Option<DateTime<Utc>>,
    assignment: Option<Assignment>,
    created_by: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    subtasks: Vec<Subtask>,
    requirements: Vec<Requirement>,
    progress: u8,
    estimated_hours: Option<Hours>,
    actual_hours: Option<Hours>,
}

impl Task {
    /// Creates a task with empty checklists and zero progress.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when the title is blank or too long, or
    /// the description is too long.
    pub fn create(
        draft: TaskDraft,
        limits: &TaskLimits,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let title = validated_title(&draft.title, limits)?;
        let description = validated_description(&draft.description, limits)?;
        let timestamp = clock.utc();

        Ok(Self {
            id: TaskId::new(),
            project_id: draft.project_id,
            title,
            description,
            status: draft.status,
            priority: draft.priority,
            deadline: draft.deadline,
            assignment: None,
            created_by: draft.created_by,
            created_at: timestamp,
            updated_at: timestamp,
            subtasks: Vec::new(),
            requirements: Vec::new(),
            progress: 0,
            estimated_hours: draft.estimated_hours,
            actual_hours: None,
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the kanban status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    /// Returns the current assignment, if any.
    #[must_use]
    pub const fn assignment(&self) -> Option<&Assignment> {
        self.assignment.as_ref()
    }

    /// Returns whether the task is assigned to `user_id`.
    #[must_use]
    pub fn is_assigned_to(&self, user_id: &UserId) -> bool {
        self.assignment
            .as_ref()
            .is_some_and(|assignment| assignment.assignee().user_id() == user_id)
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn created_by(&self) -> &UserId {
        &self.created_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the subtasks in display order.
    #[must_use]
    pub fn subtasks(&self) -> &[Subtask] {
        &self.subtasks
    }

    /// Returns the requirements in display order.
    #[must_use]
    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// Returns the derived progress percentage.
    #[must_use]
    pub const fn progress(&self) -> u8 {
        self.progress
    }

    /// Returns the effort estimate.
    #[must_use]
    pub const fn estimated_hours(&self) -> Option<Hours> {
        self.estimated_hours
    }

    /// Returns the recorded effort.
    #[must_use]
    pub const fn actual_hours(&self) -> Option<Hours> {
        self.actual_hours
    }

    /// Returns completed subtasks out of all subtasks.
    #[must_use]
    pub fn subtask_summary(&self) -> ChecklistSummary {
        ChecklistSummary::of_subtasks(&self.subtasks)
    }

    /// Returns met requirements out of all requirements.
    #[must_use]
    pub fn requirement_summary(&self) -> ChecklistSummary {
        ChecklistSummary::of_requirements(&self.requirements)
    }

    /// Classifies the deadline at `now`; `None` when there is no deadline.
    #[must_use]
    pub fn deadline_status(&self, now: DateTime<Utc>) -> Option<DeadlineStatus> {
        self.deadline
            .map(|deadline| DeadlineStatus::classify(deadline, now))
    }

    /// Returns whether the title or description contains `query`, ignoring
    /// case. A blank query matches every task.
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        needle.is_empty()
            || self.title.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }

    /// Moves the task to `status`. Any status may follow any other.
    pub fn set_status(&mut self, status: TaskStatus, clock: &impl Clock) {
        self.status = status;
        self.touch(clock);
    }

    /// Replaces the assignment, returning the previous one.
    pub fn assign(&mut self, assignment: Assignment, clock: &impl Clock) -> Option<Assignment> {
        let previous = self.assignment.replace(assignment);
        self.touch(clock);
        previous
    }

    /// Clears every assignment field at once, returning the previous
    /// assignment.
    pub fn unassign(&mut self, clock: &impl Clock) -> Option<Assignment> {
        let previous = self.assignment.take();
        self.touch(clock);
        previous
    }

    /// Applies a partial update of descriptive fields.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when a new title or description fails
    /// validation; the task is left unchanged in that case.
    pub fn apply_details(
        &mut self,
        update: TaskDetailsUpdate,
        limits: &TaskLimits,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        let title = update
            .title
            .as_deref()
            .map(|value| validated_title(value, limits))
            .transpose()?;
        let description = update
            .description
            .as_deref()
            .map(|value| validated_description(value, limits))
            .transpose()?;

        if let Some(value) = title {
            self.title = value;
        }
        if let Some(value) = description {
            self.description = value;
        }
        if let Some(value) = update.priority {
            self.priority = value;
        }
        if let Some(value) = update.deadline {
            self.deadline = value;
        }
        if let Some(value) = update.estimated_hours {
            self.estimated_hours = value;
        }
        if let Some(value) = update.actual_hours {
            self.actual_hours = value;
        }
        self.touch(clock);
        Ok(())
    }

    /// Appends a subtask and recomputes progress.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::ChecklistFull`] when the task already has
    /// the maximum number of subtasks.
    pub fn add_subtask(
        &mut self,
        subtask: Subtask,
        limits: &TaskLimits,
        clock: &impl Clock,
    ) -> Result<SubtaskId, TaskDomainError> {
        if self.subtasks.len() >= limits.max_checklist_items {
            return Err(TaskDomainError::ChecklistFull {
                limit: limits.max_checklist_items,
            });
        }
        let id = subtask.id();
        self.subtasks.push(subtask);
        self.subtasks_changed(clock);
        Ok(id)
    }

    /// Flips a subtask's completion and recomputes progress, returning the
    /// new completion state.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::SubtaskNotFound`] when the subtask does not
    /// belong to this task.
    pub fn toggle_subtask(
        &mut self,
        id: SubtaskId,
        clock: &impl Clock,
    ) -> Result<bool, TaskDomainError> {
        let subtask = self
            .subtasks
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or(TaskDomainError::SubtaskNotFound(id))?;
        subtask.toggle();
        let completed = subtask.is_completed();
        self.subtasks_changed(clock);
        Ok(completed)
    }

    /// Removes a subtask and recomputes progress.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::SubtaskNotFound`] when the subtask does not
    /// belong to this task.
    pub fn remove_subtask(
        &mut self,
        id: SubtaskId,
        clock: &impl Clock,
    ) -> Result<Subtask, TaskDomainError> {
        let index = self
            .subtasks
            .iter()
            .position(|item| item.id() == id)
            .ok_or(TaskDomainError::SubtaskNotFound(id))?;
        let removed = self.subtasks.remove(index);
        self.subtasks_changed(clock);
        Ok(removed)
    }

    /// Appends a requirement. Progress is unaffected.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::ChecklistFull`] when the task already has
    /// the maximum number of requirements.
    pub fn add_requirement(
        &mut self,
        requirement: Requirement,
        limits: &TaskLimits,
        clock: &impl Clock,
    ) -> Result<RequirementId, TaskDomainError> {
        if self.requirements.len() >= limits.max_checklist_items {
            return Err(TaskDomainError::ChecklistFull {
                limit: limits.max_checklist_items,
            });
        }
        let id = requirement.id();
        self.requirements.push(requirement);
        self.touch(clock);
        Ok(id)
    }

    /// Flips whether a requirement is met, returning the new state.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::RequirementNotFound`] when the requirement
    /// does not belong to this task.
    pub fn toggle_requirement(
        &mut self,
        id: RequirementId,
        clock: &impl Clock,
    ) -> Result<bool, TaskDomainError> {
        let requirement = self
            .requirements
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or(TaskDomainError::RequirementNotFound(id))?;
        requirement.toggle();
        let met = requirement.is_met();
        self.touch(clock);
        Ok(met)
    }

    /// Removes a requirement.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::RequirementNotFound`] when the requirement
    /// does not belong to this task.
    pub fn remove_requirement(
        &mut self,
        id: RequirementId,
        clock: &impl Clock,
    ) -> Result<Requirement, TaskDomainError> {
        let index = self
            .requirements
            .iter()
            .position(|item| item.id() == id)
            .ok_or(TaskDomainError::RequirementNotFound(id))?;
        let removed = self.requirements.remove(index);
        self.touch(clock);
        Ok(removed)
    }

    fn subtasks_changed(&mut self, clock: &impl Clock) {
        self.progress = self.subtask_summary().percent();
        self.touch(clock);
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

fn validated_title(value: &str, limits: &TaskLimits) -> Result<String, TaskDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TaskDomainError::EmptyTitle);
    }
    if trimmed.chars().count() > limits.max_title_length {
        return Err(TaskDomainError::TitleTooLong {
            limit: limits.max_title_length,
        });
    }
    Ok(trimmed.to_owned())
}

fn validated_description(value: &str, limits: &TaskLimits) -> Result<String, TaskDomainError> {
    let trimmed = value.trim();
    if trimmed.chars().count() > limits.max_description_length {
        return Err(TaskDomainError::DescriptionTooLong {
            limit: limits.max_description_length,
        });
    }
    Ok(trimmed.to_owned())
}
