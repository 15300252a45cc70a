//! Project aggregate.

use super::{ProjectId, TeamDomainError, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated project name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectName(String);

impl ProjectName {
    /// Creates a validated project name.
    ///
    /// # Errors
    ///
    /// Returns [`TeamDomainError::EmptyProjectName`] when blank, or
    /// [`TeamDomainError::ProjectNameTooLong`] when longer than `limit`
    /// characters.
    pub fn new(value: impl Into<String>, limit: usize) -> Result<Self, TeamDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TeamDomainError::EmptyProjectName);
        }
        if trimmed.chars().count() > limit {
            return Err(TeamDomainError::ProjectNameTooLong { limit });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Top-level container owning members, invitations, and tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    name: ProjectName,
    owner: UserId,
    created_at: DateTime<Utc>,
}

impl Project {
    /// Creates a new project owned by `owner`.
    #[must_use]
    pub fn new(name: ProjectName, owner: UserId, clock: &impl Clock) -> Self {
        Self {
            id: ProjectId::new(),
            name,
            owner,
            created_at: clock.utc(),
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the project name.
    #[must_use]
    pub const fn name(&self) -> &ProjectName {
        &self.name
    }

    /// Returns the user who created the project.
    #[must_use]
    pub const fn owner(&self) -> &UserId {
        &self.owner
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
