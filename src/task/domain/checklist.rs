//! Subtasks, requirements, and the progress derived from subtasks.

use super::{RequirementId, SubtaskId, TaskDomainError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Completable checklist item that drives task progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    id: SubtaskId,
    title: String,
    completed: bool,
}

impl Subtask {
    /// Creates an incomplete subtask.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptySubtaskTitle`] when the title is
    /// blank.
    pub fn new(title: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = title.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptySubtaskTitle);
        }
        Ok(Self {
            id: SubtaskId::new(),
            title: trimmed.to_owned(),
            completed: false,
        })
    }

    /// Marks the new subtask as already completed.
    #[must_use]
    pub const fn completed(mut self) -> Self {
        self.completed = true;
        self
    }

    /// Returns the subtask identifier.
    #[must_use]
    pub const fn id(&self) -> SubtaskId {
        self.id
    }

    /// Returns the subtask title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns whether the subtask is complete.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    pub(super) const fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}

/// Checklist item tracked independently of progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    id: RequirementId,
    description: String,
    met: bool,
}

impl Requirement {
    /// Creates an unmet requirement.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyRequirement`] when the description is
    /// blank.
    pub fn new(description: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = description.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyRequirement);
        }
        Ok(Self {
            id: RequirementId::new(),
            description: trimmed.to_owned(),
            met: false,
        })
    }

    /// Marks the new requirement as already met.
    #[must_use]
    pub const fn met(mut self) -> Self {
        self.met = true;
        self
    }

    /// Returns the requirement identifier.
    #[must_use]
    pub const fn id(&self) -> RequirementId {
        self.id
    }

    /// Returns the requirement description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns whether the requirement is met.
    #[must_use]
    pub const fn is_met(&self) -> bool {
        self.met
    }

    pub(super) const fn toggle(&mut self) {
        self.met = !self.met;
    }
}

/// Count of finished items out of a checklist, rendered as `done/total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistSummary {
    /// Completed subtasks or met requirements.
    pub done: usize,
    /// Total items.
    pub total: usize,
}

impl ChecklistSummary {
    /// Summarizes subtasks by completion.
    #[must_use]
    pub fn of_subtasks(subtasks: &[Subtask]) -> Self {
        Self {
            done: subtasks.iter().filter(|item| item.is_completed()).count(),
            total: subtasks.len(),
        }
    }

    /// Summarizes requirements by whether they are met.
    #[must_use]
    pub fn of_requirements(requirements: &[Requirement]) -> Self {
        Self {
            done: requirements.iter().filter(|item| item.is_met()).count(),
            total: requirements.len(),
        }
    }

    /// Returns `round(100 * done / total)`, or 0 for an empty checklist.
    ///
    /// Halves round up.
    #[must_use]
    pub fn percent(self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let done = self.done.min(self.total);
        let scaled = (200 * done + self.total).div_euclid(2 * self.total);
        u8::try_from(scaled).unwrap_or(100)
    }
}

impl fmt::Display for ChecklistSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.done, self.total)
    }
}
