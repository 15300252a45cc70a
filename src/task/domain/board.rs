//! Kanban board view over a project's tasks.

use super::{Task, TaskStatus};
use serde::Serialize;

/// One board column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardColumn {
    status: TaskStatus,
    tasks: Vec<Task>,
}

impl BoardColumn {
    /// Returns the column's status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the tasks in this column.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }
}

/// Tasks grouped into the four status columns, in board order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KanbanBoard {
    columns: Vec<BoardColumn>,
}

impl KanbanBoard {
    /// Groups `tasks` by status, keeping their relative order within each
    /// column.
    #[must_use]
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut columns: Vec<BoardColumn> = TaskStatus::ALL
            .into_iter()
            .map(|status| BoardColumn {
                status,
                tasks: Vec::new(),
            })
            .collect();
        for task in tasks {
            if let Some(column) = columns
                .iter_mut()
                .find(|column| column.status == task.status())
            {
                column.tasks.push(task);
            }
        }
        Self { columns }
    }

    /// Returns every column, `todo` first.
    #[must_use]
    pub fn columns(&self) -> &[BoardColumn] {
        &self.columns
    }

    /// Returns the tasks in the column for `status`.
    #[must_use]
    pub fn column(&self, status: TaskStatus) -> &[Task] {
        self.columns
            .iter()
            .find(|column| column.status == status)
            .map(BoardColumn::tasks)
            .unwrap_or_default()
    }

    /// Returns the total number of tasks on the board.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.iter().map(|column| column.tasks.len()).sum()
    }

    /// Returns whether the board has no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
