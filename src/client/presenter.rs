//! UI collaborator contract.
//!
//! The notification manager never touches the rendering surface directly;
//! it drives a [`Presenter`], which owns the badge element, the alert
//! container, and the audio device. [`TracingPresenter`] is the headless
//! default used by demos and server-side tooling.

use std::fmt;

use super::alerts::{AlertId, AlertView, DismissReason};
use crate::domain::NotificationKind;
use crate::error::NotifyError;

/// Rendering surface consumed (not owned) by the notification manager.
pub trait Presenter: Send + Sync + fmt::Debug {
    /// Inserts a dismissible alert into the page.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::RenderFailure`] when the alert cannot be
    /// built or attached. The manager logs and swallows this; history
    /// and counter updates have already landed by the time it is called.
    fn show_alert(&self, view: &AlertView) -> Result<(), NotifyError>;

    /// Removes a previously shown alert. An `Expired` reason should fade
    /// the element out over [`super::alerts::FADE_OUT`] before removal.
    fn dismiss_alert(&self, id: AlertId, reason: DismissReason);

    /// Refreshes the unread badge: shows the count, hidden when zero.
    fn update_badge(&self, unread: u64);

    /// Plays the audible cue for a notification kind. Best-effort.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::AudioUnsupported`] when no audio device is
    /// available; the manager logs and stays silent.
    fn play_cue(&self, kind: NotificationKind) -> Result<(), NotifyError>;
}

/// Headless presenter that logs every UI effect.
#[derive(Debug, Default)]
pub struct TracingPresenter;

impl Presenter for TracingPresenter {
    fn show_alert(&self, view: &AlertView) -> Result<(), NotifyError> {
        tracing::info!(
            id = %view.id,
            class = view.css_class,
            heading = view.heading,
            origin = %view.origin,
            message = %view.message,
            "alert shown"
        );
        Ok(())
    }

    fn dismiss_alert(&self, id: AlertId, reason: DismissReason) {
        tracing::info!(%id, ?reason, "alert dismissed");
    }

    fn update_badge(&self, unread: u64) {
        tracing::info!(unread, visible = unread > 0, "badge updated");
    }

    fn play_cue(&self, kind: NotificationKind) -> Result<(), NotifyError> {
        tracing::debug!(kind = kind.wire_name(), "audio cue would play here");
        Ok(())
    }
}
