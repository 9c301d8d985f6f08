//! The notification manager: mediates between a push transport and the
//! page UI.
//!
//! One manager is constructed per page session. It owns the transport
//! handle, the bounded history, and the unread counter for the lifetime
//! of the page; all mutation of that state goes through [`receive`] and
//! [`clear_unread`].
//!
//! [`receive`]: NotificationManager::receive
//! [`clear_unread`]: NotificationManager::clear_unread

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{RwLock, broadcast};
use tokio::task::JoinHandle;

use super::alerts::AlertStack;
use super::history::NotificationHistory;
use super::presenter::Presenter;
use crate::domain::{Notification, NotificationKind, UserContext, UserId};
use crate::error::NotifyError;
use crate::transport::{Transport, TransportState};
use crate::ws::messages::WireMessage;

#[derive(Debug, Default)]
struct ManagerState {
    history: NotificationHistory,
    unread: u64,
}

/// Client-side notification core.
///
/// Deliveries arrive through [`Self::receive_raw`] (wired to the
/// transport by [`Self::spawn_inbound`]); locally-originated sends go out
/// through [`Self::send`] and only come back into history as a transport
/// echo.
#[derive(Debug)]
pub struct NotificationManager {
    transport: Arc<dyn Transport>,
    context: UserContext,
    presenter: Arc<dyn Presenter>,
    alerts: AlertStack,
    state: RwLock<ManagerState>,
}

impl NotificationManager {
    /// Creates a manager over an already-constructed transport.
    #[must_use]
    pub fn new(
        transport: Arc<dyn Transport>,
        context: UserContext,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        tracing::info!(
            state = %transport.state(),
            user = ?context.user_id,
            "notification manager initialized"
        );
        Self {
            transport,
            context,
            presenter: Arc::clone(&presenter),
            alerts: AlertStack::new(presenter),
            state: RwLock::new(ManagerState::default()),
        }
    }

    /// Spawns the task pumping transport deliveries into the manager.
    pub fn spawn_inbound(manager: Arc<Self>) -> JoinHandle<()> {
        let mut rx = manager.transport.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(raw) => manager.receive_raw(&raw).await,
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "manager lagged behind transport inbound");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            tracing::debug!("inbound pump stopped");
        })
    }

    /// Parses a raw inbound payload and dispatches it.
    ///
    /// Malformed payloads are logged and dropped; nothing escapes to the
    /// caller's task.
    pub async fn receive_raw(&self, raw: &str) {
        match serde_json::from_str::<WireMessage>(raw) {
            Ok(WireMessage::NotifyUser(notification)) => self.receive(notification).await,
            Ok(WireMessage::Ack { delivered }) => {
                tracing::debug!(delivered, "send acknowledged");
            }
            Ok(WireMessage::Error { code, message }) => {
                tracing::warn!(code, message, "gateway reported an error");
            }
            // Server-bound envelope; nothing to do on the client.
            Ok(WireMessage::Identify { .. }) => {}
            Err(err) => {
                tracing::warn!(%err, "dropping malformed inbound payload");
            }
        }
    }

    /// Accepts one inbound notification.
    ///
    /// Deliveries addressed to someone else are silently dropped. An
    /// accepted notification lands in history and bumps the unread
    /// counter before any presentation runs, so render or audio failures
    /// can never lose it.
    pub async fn receive(&self, notification: Notification) {
        if !notification.is_addressed_to(self.context.user_id.as_ref()) {
            tracing::debug!(
                target = ?notification.target_user_id,
                "dropping notification addressed to another user"
            );
            return;
        }

        let unread = {
            let mut state = self.state.write().await;
            state.history.push(notification.clone());
            state.unread = state.unread.saturating_add(1);
            state.unread
        };
        self.presenter.update_badge(unread);

        if let Err(err) = self.alerts.render(&notification) {
            tracing::error!(%err, "alert render failed");
        }
        if let Err(err) = self.presenter.play_cue(notification.kind) {
            tracing::debug!(%err, "audio cue unavailable");
        }
    }

    /// Originates a notification to another user.
    ///
    /// The notification is stamped with this session's origin name and
    /// the current time, wrapped in a `notify_user` envelope, and handed
    /// to the transport. Local history is untouched: it only changes on
    /// the inbound path, including any echo the transport delivers back.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::TransportNotReady`] when the channel is not
    /// open, and [`NotifyError::TransportSend`] when the handoff fails.
    pub fn send(
        &self,
        target_user_id: Option<UserId>,
        kind: NotificationKind,
        beneficiary: Option<String>,
        message: impl Into<String>,
    ) -> Result<(), NotifyError> {
        let state = self.transport.state();
        if state != TransportState::Open {
            tracing::warn!(%state, "refusing to send: push channel is not open");
            return Err(NotifyError::TransportNotReady(state));
        }

        let notification = Notification {
            kind,
            origin: self.context.origin_name(),
            target_user_id,
            broadcast_to_all: false,
            beneficiary,
            message: message.into(),
            timestamp: Utc::now(),
            simulated: false,
        };
        let payload = serde_json::to_string(&WireMessage::NotifyUser(notification))
            .map_err(|err| NotifyError::Internal(err.to_string()))?;
        self.transport.send(&payload)
    }

    /// Resets the unread counter and refreshes the badge. History is
    /// unaffected.
    pub async fn clear_unread(&self) {
        let mut state = self.state.write().await;
        state.unread = 0;
        drop(state);
        self.presenter.update_badge(0);
    }

    /// Returns the ordered history snapshot, newest first.
    pub async fn history(&self) -> Vec<Notification> {
        self.state.read().await.history.snapshot()
    }

    /// Returns the current unread count.
    pub async fn unread(&self) -> u64 {
        self.state.read().await.unread
    }

    /// Returns the alert stack, for wiring manual dismiss controls.
    #[must_use]
    pub fn alerts(&self) -> &AlertStack {
        &self.alerts
    }

    /// Closes the underlying transport. Idempotent.
    pub fn close(&self) {
        self.transport.close();
    }
}
