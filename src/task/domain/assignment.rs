//! Task assignment snapshots.
//!
//! The assignee's name, email, and photo are copied from their membership
//! at assignment time. They are deliberately not live references: later
//! profile changes do not reach tasks already assigned.

use crate::team::domain::{EmailAddress, Member, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Copy of the assignee's member profile taken when the task was assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssigneeSnapshot {
    user_id: UserId,
    name: String,
    email: EmailAddress,
    photo_url: Option<String>,
}

impl AssigneeSnapshot {
    /// Captures the current profile of `member`.
    #[must_use]
    pub fn of(member: &Member) -> Self {
        Self {
            user_id: member.user_id().clone(),
            name: member.display_name().to_owned(),
            email: member.email().clone(),
            photo_url: member.photo_url().map(str::to_owned),
        }
    }

    /// Returns the assignee's user identifier.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns the assignee's name at assignment time.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the assignee's email at assignment time.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the assignee's photo URL at assignment time.
    #[must_use]
    pub fn photo_url(&self) -> Option<&str> {
        self.photo_url.as_deref()
    }
}

/// Who a task is assigned to, by whom, and when.
///
/// Tasks hold this as one optional value so that assigning and unassigning
/// always set or clear every assignment field together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    assignee: AssigneeSnapshot,
    assigned_by: UserId,
    assigned_at: DateTime<Utc>,
}

impl Assignment {
    /// Creates an assignment record.
    #[must_use]
    pub const fn new(
        assignee: AssigneeSnapshot,
        assigned_by: UserId,
        assigned_at: DateTime<Utc>,
    ) -> Self {
        Self {
            assignee,
            assigned_by,
            assigned_at,
        }
    }

    /// Returns the assignee snapshot.
    #[must_use]
    pub const fn assignee(&self) -> &AssigneeSnapshot {
        &self.assignee
    }

    /// Returns the user who made the assignment.
    #[must_use]
    pub const fn assigned_by(&self) -> &UserId {
        &self.assigned_by
    }

    /// Returns when the assignment was made.
    #[must_use]
    pub const fn assigned_at(&self) -> DateTime<Utc> {
        self.assigned_at
    }
}
