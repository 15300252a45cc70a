//! Caller identity supplied by the external identity provider.

use super::{EmailAddress, TeamDomainError, UserId};
use serde::{Deserialize, Serialize};

/// Authenticated user acting on a command.
///
/// The engine trusts the caller to have authenticated this identity; it
/// only validates shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    user_id: UserId,
    email: EmailAddress,
    display_name: String,
    photo_url: Option<String>,
}

impl Identity {
    /// Creates an identity from provider-supplied fields.
    ///
    /// # Errors
    ///
    /// Returns [`TeamDomainError`] when the user id is blank, the email is
    /// malformed, or the display name is blank.
    pub fn new(
        user_id: impl Into<String>,
        email: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Result<Self, TeamDomainError> {
        let name = display_name.into();
        let trimmed_name = name.trim();
        if trimmed_name.is_empty() {
            return Err(TeamDomainError::EmptyDisplayName);
        }
        Ok(Self {
            user_id: UserId::new(user_id)?,
            email: EmailAddress::new(email)?,
            display_name: trimmed_name.to_owned(),
            photo_url: None,
        })
    }

    /// Sets the profile photo URL.
    #[must_use]
    pub fn with_photo_url(mut self, photo_url: impl Into<String>) -> Self {
        self.photo_url = Some(photo_url.into());
        self
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns the authenticated email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the profile photo URL, if any.
    #[must_use]
    pub fn photo_url(&self) -> Option<&str> {
        self.photo_url.as_deref()
    }

    /// Checks the display name against a length limit.
    ///
    /// # Errors
    ///
    /// Returns [`TeamDomainError::DisplayNameTooLong`] when the name has more
    /// than `limit` characters.
    pub fn check_display_name(&self, limit: usize) -> Result<(), TeamDomainError> {
        if self.display_name.chars().count() > limit {
            return Err(TeamDomainError::DisplayNameTooLong { limit });
        }
        Ok(())
    }
}
