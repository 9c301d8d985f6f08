//! Transient alert lifecycle.
//!
//! [`AlertStack`] owns the set of live alerts. Each non-urgent alert gets
//! its own dismiss timer; urgent alerts persist until manually dismissed.
//! Timers and manual dismissal race safely: whoever removes the alert
//! from the stack first wins, and the loser does nothing.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::presenter::Presenter;
use crate::domain::Notification;
use crate::error::NotifyError;

/// Delay before a non-urgent alert auto-dismisses.
pub const AUTO_DISMISS_AFTER: Duration = Duration::from_secs(10);

/// Fade-out duration applied by presenters on expiry.
pub const FADE_OUT: Duration = Duration::from_millis(300);

/// Unique identifier for a rendered alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlertId(uuid::Uuid);

impl AlertId {
    fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl fmt::Display for AlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why an alert was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    /// The user clicked the dismiss control.
    Manual,
    /// The auto-dismiss timer fired.
    Expired,
}

/// Everything a presenter needs to draw one alert.
#[derive(Debug, Clone)]
pub struct AlertView {
    /// Identity of the alert, used for dismissal.
    pub id: AlertId,
    /// CSS class from the kind's style record.
    pub css_class: &'static str,
    /// Icon name from the kind's style record.
    pub icon: &'static str,
    /// Header label ("URGENT" for urgent, "Notification" otherwise).
    pub heading: &'static str,
    /// Sender display name.
    pub origin: String,
    /// Case subject line, when present.
    pub beneficiary: Option<String>,
    /// Body text.
    pub message: String,
    /// Footer timestamp, `dd/mm/yyyy HH:MM`.
    pub timestamp_text: String,
    /// Whether the notification came from a simulated transport.
    pub simulated: bool,
}

/// Live alerts and their dismiss timers.
#[derive(Debug)]
pub struct AlertStack {
    presenter: Arc<dyn Presenter>,
    live: Arc<Mutex<HashSet<AlertId>>>,
}

impl AlertStack {
    /// Creates an empty stack driving the given presenter.
    #[must_use]
    pub fn new(presenter: Arc<dyn Presenter>) -> Self {
        Self {
            presenter,
            live: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Renders a notification as a transient alert.
    ///
    /// Non-urgent kinds are scheduled for auto-dismissal after
    /// [`AUTO_DISMISS_AFTER`]; urgent alerts stay until manually
    /// dismissed.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::RenderFailure`] when the presenter cannot
    /// show the alert; the alert is not tracked in that case.
    pub fn render(&self, notification: &Notification) -> Result<AlertId, NotifyError> {
        let style = notification.kind.style();
        let id = AlertId::new();
        let view = AlertView {
            id,
            css_class: style.css_class,
            icon: style.icon,
            heading: style.heading,
            origin: notification.origin.clone(),
            beneficiary: notification.beneficiary.clone(),
            message: notification.message.clone(),
            timestamp_text: format_timestamp(notification.timestamp),
            simulated: notification.simulated,
        };

        self.insert(id);
        if let Err(err) = self.presenter.show_alert(&view) {
            self.take(id);
            return Err(err);
        }

        if style.auto_dismiss {
            let live = Arc::clone(&self.live);
            let presenter = Arc::clone(&self.presenter);
            tokio::spawn(async move {
                tokio::time::sleep(AUTO_DISMISS_AFTER).await;
                // Manual dismissal may have won the race already.
                let removed = live
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .remove(&id);
                if removed {
                    presenter.dismiss_alert(id, DismissReason::Expired);
                }
            });
        }

        Ok(id)
    }

    /// Dismisses an alert immediately. Returns `false` if it was already
    /// gone.
    pub fn dismiss(&self, id: AlertId) -> bool {
        if self.take(id) {
            self.presenter.dismiss_alert(id, DismissReason::Manual);
            true
        } else {
            false
        }
    }

    /// Returns `true` if the alert is still on screen.
    #[must_use]
    pub fn is_live(&self, id: AlertId) -> bool {
        self.live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&id)
    }

    /// Returns the number of live alerts.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn insert(&self, id: AlertId) {
        self.live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id);
    }

    fn take(&self, id: AlertId) -> bool {
        self.live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
    }
}

/// Formats an alert footer timestamp.
fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%d/%m/%Y %H:%M").to_string()
}
