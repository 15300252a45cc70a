//! Normalized email addresses.

use super::TeamDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Email address, trimmed and lowercased so that comparisons are exact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated, normalized email address.
    ///
    /// The value must contain exactly one `@` with a non-empty local part and
    /// a dotted domain, and no whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`TeamDomainError::InvalidEmail`] for malformed input.
    pub fn new(value: impl Into<String>) -> Result<Self, TeamDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_lowercase();
        let mut parts = normalized.split('@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().unwrap_or_default();
        let is_valid = !local.is_empty()
            && parts.next().is_none()
            && domain.contains('.')
            && domain.split('.').all(|label| !label.is_empty())
            && !normalized.chars().any(char::is_whitespace);

        if !is_valid {
            return Err(TeamDomainError::InvalidEmail(raw));
        }
        Ok(Self(normalized))
    }

    /// Returns the address as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
