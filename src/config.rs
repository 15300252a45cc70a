//! Engine configuration.
//!
//! Limits are deserialized from JSON with every field optional; omitted
//! fields fall back to the production defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level configuration for the collaboration engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Limits applied to task fields and checklists.
    pub tasks: TaskLimits,
    /// Limits applied to project and member fields.
    pub team: TeamLimits,
}

impl EngineConfig {
    /// Parses a configuration document in JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the document is not valid JSON or
    /// does not match the configuration shape, and [`ConfigError::ZeroLimit`]
    /// when any limit is zero.
    pub fn from_json_str(document: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every limit admits at least one character or item.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroLimit`] naming the first zero limit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = [
            ("tasks.max_title_length", self.tasks.max_title_length),
            (
                "tasks.max_description_length",
                self.tasks.max_description_length,
            ),
            ("tasks.max_checklist_items", self.tasks.max_checklist_items),
            (
                "team.max_project_name_length",
                self.team.max_project_name_length,
            ),
            (
                "team.max_display_name_length",
                self.team.max_display_name_length,
            ),
        ];
        limits
            .into_iter()
            .find(|(_, value)| *value == 0)
            .map_or(Ok(()), |(name, _)| Err(ConfigError::ZeroLimit(name)))
    }
}

/// Limits applied by the task lifecycle service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskLimits {
    /// Maximum task title length in characters.
    pub max_title_length: usize,
    /// Maximum task description length in characters.
    pub max_description_length: usize,
    /// Maximum number of subtasks, and separately of requirements, per task.
    pub max_checklist_items: usize,
}

impl Default for TaskLimits {
    fn default() -> Self {
        Self {
            max_title_length: 200,
            max_description_length: 10_000,
            max_checklist_items: 100,
        }
    }
}

/// Limits applied by the membership and invitation services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamLimits {
    /// Maximum project name length in characters.
    pub max_project_name_length: usize,
    /// Maximum member display name length in characters.
    pub max_display_name_length: usize,
}

impl Default for TeamLimits {
    fn default() -> Self {
        Self {
            max_project_name_length: 120,
            max_display_name_length: 100,
        }
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document could not be parsed.
    #[error("invalid configuration document: {0}")]
    Parse(#[from] serde_json::Error),

    /// A limit was configured as zero.
    #[error("configuration limit {0} must be greater than zero")]
    ZeroLimit(&'static str),
}
