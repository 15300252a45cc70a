//! Deadline classification, recomputed on every read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Days ahead within which a deadline counts as due soon.
pub const DUE_SOON_DAYS: i64 = 3;

/// Urgency of a deadline relative to a reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "days_left", rename_all = "snake_case")]
pub enum DeadlineStatus {
    /// The deadline has passed.
    Overdue,
    /// Less than one whole day remains.
    DueToday,
    /// One to [`DUE_SOON_DAYS`] whole days remain.
    DueSoon(i64),
    /// More than [`DUE_SOON_DAYS`] whole days remain.
    Normal(i64),
}

impl DeadlineStatus {
    /// Classifies `deadline` as seen at `now`.
    ///
    /// Remaining time is counted in whole days, truncating partial days.
    #[must_use]
    pub fn classify(deadline: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if deadline < now {
            return Self::Overdue;
        }
        match (deadline - now).num_days() {
            0 => Self::DueToday,
            days if days <= DUE_SOON_DAYS => Self::DueSoon(days),
            days => Self::Normal(days),
        }
    }

    /// Returns whether the deadline needs attention (overdue, today, or soon).
    #[must_use]
    pub const fn is_urgent(self) -> bool {
        !matches!(self, Self::Normal(_))
    }
}
