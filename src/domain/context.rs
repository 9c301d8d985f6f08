//! Identity context for the local side of a notification session.

use super::UserId;

/// Who the notification manager is acting for.
///
/// Passed in explicitly at construction instead of being read from shared
/// page globals. Both fields are optional: an unauthenticated session has
/// no identity and therefore accepts every delivery.
#[derive(Debug, Clone, Default)]
pub struct UserContext {
    /// Identifier of the signed-in user, if any.
    pub user_id: Option<UserId>,
    /// Display name used as the `origin` of locally-originated sends.
    pub display_name: Option<String>,
}

impl UserContext {
    /// Creates a context for a signed-in user.
    #[must_use]
    pub fn new(user_id: UserId, display_name: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id),
            display_name: Some(display_name.into()),
        }
    }

    /// Creates an anonymous context (no filtering, sends originate from
    /// "System").
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Returns the origin name stamped onto outbound notifications.
    #[must_use]
    pub fn origin_name(&self) -> String {
        self.display_name
            .clone()
            .unwrap_or_else(|| "System".to_string())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn origin_name_uses_display_name() {
        let ctx = UserContext::new(UserId::new(), "Maria Souza");
        assert_eq!(ctx.origin_name(), "Maria Souza");
    }

    #[test]
    fn anonymous_origin_falls_back_to_system() {
        let ctx = UserContext::anonymous();
        assert_eq!(ctx.origin_name(), "System");
        assert!(ctx.user_id.is_none());
    }
}
