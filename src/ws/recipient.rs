//! Per-connection recipient filter.
//!
//! Tracks which user a WebSocket connection belongs to and provides
//! server-side filtering of fanned-out notifications, so targeted
//! messages are not pushed to unrelated sessions.

use crate::domain::{Notification, UserId};

/// Recipient identity for a single WebSocket connection.
///
/// Until the client identifies itself, the connection receives every
/// notification (the client manager applies its own filter as well).
#[derive(Debug, Default)]
pub struct RecipientFilter {
    identity: Option<UserId>,
}

impl RecipientFilter {
    /// Creates an unidentified filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the connection to a user identity. A later `identify`
    /// replaces the earlier one.
    pub fn identify(&mut self, user_id: UserId) {
        self.identity = Some(user_id);
    }

    /// Returns the bound identity, if any.
    #[must_use]
    pub fn identity(&self) -> Option<&UserId> {
        self.identity.as_ref()
    }

    /// Returns `true` if the notification should be forwarded on this
    /// connection.
    #[must_use]
    pub fn matches(&self, notification: &Notification) -> bool {
        notification.is_addressed_to(self.identity.as_ref())
    }
}
