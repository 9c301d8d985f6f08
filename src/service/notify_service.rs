//! Notification service: accepts notifications and fans them out.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::{EventBus, Notification};

/// Orchestration layer between inbound notifications and the event bus.
///
/// Stateless apart from a published counter: both the WebSocket layer and
/// the REST injection endpoint hand accepted notifications to this
/// service, which logs them and publishes them for per-connection
/// fan-out.
#[derive(Debug)]
pub struct NotifyService {
    event_bus: EventBus,
    published: AtomicU64,
}

impl NotifyService {
    /// Creates a new `NotifyService`.
    #[must_use]
    pub fn new(event_bus: EventBus) -> Self {
        Self {
            event_bus,
            published: AtomicU64::new(0),
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Publishes a notification to every subscribed connection.
    ///
    /// Returns the number of receivers it was delivered to. Recipient
    /// filtering happens per connection, not here.
    pub fn publish(&self, notification: Notification) -> usize {
        let kind = notification.kind;
        let target = notification.target_user_id;
        let delivered = self.event_bus.publish(notification);
        self.published.fetch_add(1, Ordering::Relaxed);

        tracing::info!(
            kind = kind.wire_name(),
            target = ?target,
            delivered,
            "notification published"
        );
        delivered
    }

    /// Returns how many notifications this service has published.
    #[must_use]
    pub fn published_count(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::NotificationKind;
    use chrono::Utc;

    fn make_notification() -> Notification {
        Notification {
            kind: NotificationKind::AttendanceWaiting,
            origin: "Reception".to_string(),
            target_user_id: None,
            broadcast_to_all: false,
            beneficiary: Some("J. Silva".to_string()),
            message: "Waiting at desk 2".to_string(),
            timestamp: Utc::now(),
            simulated: false,
        }
    }

    #[tokio::test]
    async fn publish_reaches_subscribers_and_counts() {
        let bus = EventBus::new(16);
        let service = NotifyService::new(bus.clone());
        let mut rx = bus.subscribe();

        let delivered = service.publish(make_notification());
        assert_eq!(delivered, 1);
        assert_eq!(service.published_count(), 1);

        let received = rx.recv().await;
        let Ok(received) = received else {
            panic!("expected delivery");
        };
        assert_eq!(received.message, "Waiting at desk 2");
    }

    #[test]
    fn publish_without_subscribers_still_counts() {
        let service = NotifyService::new(EventBus::new(16));
        let delivered = service.publish(make_notification());
        assert_eq!(delivered, 0);
        assert_eq!(service.published_count(), 1);
    }
}
