//! Bounded, most-recent-first notification history.

use std::collections::VecDeque;

use crate::domain::Notification;

/// Maximum number of notifications retained in history.
pub const HISTORY_CAP: usize = 20;

/// Rolling in-memory history of accepted notifications.
///
/// Ordered most-recent-first. Insertion beyond [`HISTORY_CAP`] evicts the
/// oldest entry; there is no per-item deletion.
#[derive(Debug, Default)]
pub struct NotificationHistory {
    entries: VecDeque<Notification>,
}

impl NotificationHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepends a notification, evicting the oldest entry past the cap.
    pub fn push(&mut self, notification: Notification) {
        self.entries.push_front(notification);
        self.entries.truncate(HISTORY_CAP);
    }

    /// Returns an ordered snapshot, newest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Notification> {
        self.entries.iter().cloned().collect()
    }

    /// Returns the number of retained notifications.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been retained yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::NotificationKind;
    use chrono::Utc;

    fn numbered(i: usize) -> Notification {
        Notification {
            kind: NotificationKind::Default,
            origin: "System".to_string(),
            target_user_id: None,
            broadcast_to_all: false,
            beneficiary: None,
            message: format!("n{i}"),
            timestamp: Utc::now(),
            simulated: false,
        }
    }

    #[test]
    fn newest_entry_is_first() {
        let mut history = NotificationHistory::new();
        history.push(numbered(1));
        history.push(numbered(2));

        let snapshot = history.snapshot();
        assert_eq!(snapshot.first().map(|n| n.message.as_str()), Some("n2"));
        assert_eq!(snapshot.last().map(|n| n.message.as_str()), Some("n1"));
    }

    #[test]
    fn cap_evicts_oldest() {
        let mut history = NotificationHistory::new();
        for i in 0..25 {
            history.push(numbered(i));
        }

        assert_eq!(history.len(), HISTORY_CAP);
        let snapshot = history.snapshot();
        // Most recent 20 survive: 24 down to 5, newest first.
        assert_eq!(snapshot.first().map(|n| n.message.as_str()), Some("n24"));
        assert_eq!(snapshot.last().map(|n| n.message.as_str()), Some("n5"));
        assert!(!snapshot.iter().any(|n| n.message == "n4"));
    }

    #[test]
    fn empty_history_reports_empty() {
        let history = NotificationHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.len(), 0);
        assert!(history.snapshot().is_empty());
    }
}
