//! Domain model for kanban tasks.
//!
//! Tasks move freely between status columns, carry an optional assignment
//! snapshot, and derive their progress from completed subtasks.
//! Infrastructure concerns stay outside the domain boundary.

mod assignment;
mod board;
mod checklist;
mod deadline;
mod error;
mod hours;
mod ids;
mod status;
mod task;

pub use assignment::{AssigneeSnapshot, Assignment};
pub use board::{BoardColumn, KanbanBoard};
pub use checklist::{ChecklistSummary, Requirement, Subtask};
pub use deadline::{DUE_SOON_DAYS, DeadlineStatus};
pub use error::{ParseTaskPriorityError, ParseTaskStatusError, TaskDomainError};
pub use hours::Hours;
pub use ids::{RequirementId, SubtaskId, TaskId};
pub use status::{TaskPriority, TaskStatus};
pub use task::{Task, TaskDetailsUpdate, TaskDraft};
