//! Error types for task domain validation and parsing.

use super::{RequirementId, SubtaskId};
use thiserror::Error;

/// Errors returned while constructing or mutating task domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task title exceeds the configured limit.
    #[error("task title exceeds {limit} character limit")]
    TitleTooLong {
        /// Configured maximum length.
        limit: usize,
    },

    /// The task description exceeds the configured limit.
    #[error("task description exceeds {limit} character limit")]
    DescriptionTooLong {
        /// Configured maximum length.
        limit: usize,
    },

    /// A subtask title is empty after trimming.
    #[error("subtask title must not be empty")]
    EmptySubtaskTitle,

    /// A requirement description is empty after trimming.
    #[error("requirement description must not be empty")]
    EmptyRequirement,

    /// The checklist already holds the configured maximum of items.
    #[error("checklist is full ({limit} items)")]
    ChecklistFull {
        /// Configured maximum item count.
        limit: usize,
    },

    /// An hours estimate is negative or not finite.
    #[error("hours must be a finite, non-negative number, got {0}")]
    InvalidHours(String),

    /// The subtask does not belong to the task.
    #[error("subtask not found: {0}")]
    SubtaskNotFound(SubtaskId),

    /// The requirement does not belong to the task.
    #[error("requirement not found: {0}")]
    RequirementNotFound(RequirementId),
}

/// Error returned while parsing task status from persistence or input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task priority from persistence or input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParseTaskPriorityError(pub String);
