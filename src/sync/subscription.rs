//! Subscription handles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Collection a subscriber observes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    /// Active members of one project.
    Members,
    /// Tasks of one project.
    Tasks,
    /// Outstanding invitations addressed to one email.
    InvitationsForEmail,
}

impl CollectionKind {
    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Members => "members",
            Self::Tasks => "tasks",
            Self::InvitationsForEmail => "invitations_for_email",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type Cancel = Box<dyn FnOnce() + Send + Sync>;

/// Live registration of a snapshot callback.
///
/// Dropping the handle, or calling [`Subscription::unsubscribe`], removes
/// the callback; no delivery starts after removal.
#[must_use = "dropping a subscription unsubscribes it"]
pub struct Subscription {
    kind: CollectionKind,
    cancel: Option<Cancel>,
}

impl Subscription {
    pub(crate) fn new(kind: CollectionKind, cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            kind,
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Returns the observed collection kind.
    #[must_use]
    pub const fn kind(&self) -> CollectionKind {
        self.kind
    }

    /// Removes the callback.
    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("kind", &self.kind)
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
